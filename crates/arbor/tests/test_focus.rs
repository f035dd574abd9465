//! Integration tests for focus movement and the tab chain.

#[cfg(test)]
mod tests {
    use arbor::{
        Key, Result,
        tutils::ttree::{get_state, reset_state, run_ttree},
    };

    #[test]
    fn tab_bootstraps_to_the_first_tabable_node() -> Result<()> {
        run_ttree(|c, t| {
            assert_eq!(c.focused(), None);
            assert!(c.key(Key::Tab, true)?);
            assert_eq!(c.focused(), Some(t.ba_la));
            assert_eq!(get_state().path, vec!["ba_la@focus"]);
            Ok(())
        })
    }

    #[test]
    fn tab_walks_the_chain_in_layout_order() -> Result<()> {
        run_ttree(|c, t| {
            c.set_focus(t.ba_la);
            // The chain registers leaves before their branch, so the walk
            // visits ba_la, ba_lb, ba, bb_la, bb_lb, bb.
            for expect in [t.ba_lb, t.ba, t.bb_la, t.bb_lb, t.bb] {
                c.layout();
                assert!(c.key(Key::Tab, true)?);
                assert_eq!(c.focused(), Some(expect));
            }
            // Past the last tabable node there is no wraparound.
            c.layout();
            assert!(!c.key(Key::Tab, true)?);
            assert_eq!(c.focused(), Some(t.bb));
            Ok(())
        })
    }

    #[test]
    fn the_chain_rebuilds_on_layout_not_on_focus_moves() -> Result<()> {
        run_ttree(|c, t| {
            c.set_focus(t.ba_la);
            c.layout();
            assert_eq!(c.next_tab(), Some(t.ba_lb));

            assert!(c.key(Key::Tab, true)?);
            assert_eq!(c.focused(), Some(t.ba_lb));

            // Without another layout pass the chain still points at the
            // node that now has focus, so Tab goes nowhere.
            assert!(!c.key(Key::Tab, true)?);
            assert_eq!(c.focused(), Some(t.ba_lb));

            c.layout();
            assert!(c.key(Key::Tab, true)?);
            assert_eq!(c.focused(), Some(t.ba));
            Ok(())
        })
    }

    #[test]
    fn focus_and_blur_hooks_fire_in_order() -> Result<()> {
        run_ttree(|c, t| {
            assert!(c.set_focus(t.ba_la));
            assert!(c.set_focus(t.bb_la));
            // Refocusing the focused node is a no-op.
            assert!(!c.set_focus(t.bb_la));
            c.blur();
            assert_eq!(
                get_state().path,
                vec!["ba_la@focus", "ba_la@blur", "bb_la@focus", "bb_la@blur"]
            );
            assert_eq!(c.focused(), None);
            Ok(())
        })
    }

    #[test]
    fn removing_the_focused_node_clears_focus() -> Result<()> {
        run_ttree(|c, t| {
            c.set_focus(t.ba_la);
            c.remove(t.ba_la)?;
            assert_eq!(c.focused(), None);

            // The next pass rebuilds the chain without the dead node.
            c.layout();
            reset_state();
            assert!(c.key(Key::Tab, true)?);
            assert_eq!(c.focused(), Some(t.ba_lb));
            assert_eq!(get_state().path, vec!["ba_lb@focus"]);
            Ok(())
        })
    }

    #[test]
    fn hidden_nodes_drop_out_of_the_chain() -> Result<()> {
        run_ttree(|c, t| {
            c.hide(t.ba_lb);
            c.set_focus(t.ba_la);
            c.layout();
            assert!(c.key(Key::Tab, true)?);
            assert_eq!(c.focused(), Some(t.ba));
            Ok(())
        })
    }

    #[test]
    fn first_tab_tracks_the_layout_walk() -> Result<()> {
        run_ttree(|c, t| {
            assert_eq!(c.first_tab(), Some(t.ba_la));
            c.hide(t.ba_la);
            c.layout();
            assert_eq!(c.first_tab(), Some(t.ba_lb));
            Ok(())
        })
    }
}
