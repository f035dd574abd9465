//! Debug dumps of the canvas tree.

use std::io::Write;

use termcolor::{Buffer, Color, ColorSpec, WriteColor};

use crate::{canvas::Canvas, error::Result, id::NodeId};

/// Traverses the canvas tree and returns a string showing each node's
/// name, geometry, and flags for visual display. This is a debug
/// function.
pub fn dump(canvas: &Canvas) -> Result<String> {
    render_dump(canvas, false)
}

/// Like [`dump`], additionally marking the focused node.
pub fn dump_with_focus(canvas: &Canvas) -> Result<String> {
    render_dump(canvas, true)
}

/// Shared entry for the two dump flavors.
fn render_dump(canvas: &Canvas, mark_focus: bool) -> Result<String> {
    let mut buffer = Buffer::ansi();
    dump_node(canvas, &mut buffer, canvas.root(), 0, mark_focus)?;
    Ok(String::from_utf8_lossy(buffer.as_slice()).into_owned())
}

/// Helper to write an indented, colored label followed by a value
fn write_field(buffer: &mut Buffer, indent: &str, label: &str, value: &str) {
    write!(buffer, "{indent}  ").unwrap();
    buffer
        .set_color(ColorSpec::new().set_fg(Some(Color::Green)))
        .unwrap();
    write!(buffer, "{label}").unwrap();
    buffer.reset().unwrap();
    writeln!(buffer, " {value}").unwrap();
}

/// Helper to write a colored parenthesized marker after the node name.
fn write_marker(buffer: &mut Buffer, color: Color, marker: &str) {
    buffer
        .set_color(ColorSpec::new().set_fg(Some(color)))
        .unwrap();
    write!(buffer, " ({marker})").unwrap();
    buffer.reset().unwrap();
}

/// Write one node and recurse into its children.
fn dump_node(
    canvas: &Canvas,
    buffer: &mut Buffer,
    id: NodeId,
    level: usize,
    mark_focus: bool,
) -> Result<()> {
    // Create indentation based on the level
    let indent = "    ".repeat(level);
    let node = canvas.node(id);

    // Write indent
    write!(buffer, "{indent}").unwrap();

    // Format the node name with bold and color
    buffer
        .set_color(ColorSpec::new().set_fg(Some(Color::Cyan)).set_bold(true))
        .unwrap();
    write!(buffer, "{}", node.name()).unwrap();
    buffer.reset().unwrap();

    if node.is_hidden() {
        write_marker(buffer, Color::Yellow, "hidden");
    }
    if node.is_disabled() {
        write_marker(buffer, Color::Yellow, "disabled");
    }
    if mark_focus && canvas.focused() == Some(id) {
        write_marker(buffer, Color::Magenta, "focused");
    }
    writeln!(buffer).unwrap();

    // Format bounds in the parent's space
    let bounds = node.bounds();
    write_field(
        buffer,
        &indent,
        "bounds:",
        &format!(
            "x: {}, y: {}, w: {}, h: {}",
            bounds.x, bounds.y, bounds.w, bounds.h
        ),
    );

    // Format the interior left for fill children after edge docking
    let inner = node.inner_bounds();
    write_field(
        buffer,
        &indent,
        "inner:",
        &format!(
            "x: {}, y: {}, w: {}, h: {}",
            inner.x, inner.y, inner.w, inner.h
        ),
    );

    if !node.dock().is_empty() {
        write_field(buffer, &indent, "dock:", &format!("{:?}", node.dock()));
    }
    if node.is_cached() {
        let state = if node.is_cache_dirty() { "dirty" } else { "fresh" };
        write_field(buffer, &indent, "cached:", state);
    }

    // Recursively dump children
    for &child in node.children() {
        dump_node(canvas, buffer, child, level + 1, mark_focus)?;
    }

    Ok(())
}
