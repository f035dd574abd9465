use slotmap::new_key_type;

new_key_type! {
    /// Identifier for a node in the canvas arena.
    ///
    /// Ids are stable for the lifetime of the node and are never reused
    /// while the node is live. Holding an id does not keep the node alive;
    /// operations on a removed id either error with
    /// [`Error::NodeNotFound`](crate::Error::NodeNotFound) or no-op,
    /// depending on the operation's contract.
    pub struct NodeId;
}
