//! Lexical scopes of one function
//!
//! Frames are persistent maps, so entering a body copies the visible names
//! in O(1) and leaving it just drops the frame. A frame also remembers the
//! names declared by nested frames that already closed, which is what makes
//! `{ a := 1; } a := 2;` a conflict while two sibling blocks may each
//! declare their own `a`.

use im::HashMap;
use plamp_parser::{NodeId, PlampType, Symbol};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariableKind {
    Parameter,
    Local,
}

/// A parameter or local variable
#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    /// `None` while the type is unknown
    pub ty: Option<PlampType>,
    /// The node that defined it
    pub node: NodeId,
    pub kind: VariableKind,
}

#[derive(Debug, Clone, Default)]
struct Frame {
    visible: HashMap<Symbol, Variable>,
    declared: HashMap<Symbol, NodeId>,
    declared_in_nested: HashMap<Symbol, NodeId>,
}

/// Stack of frames, innermost last
#[derive(Debug, Clone)]
pub struct ScopeStack {
    frames: Vec<Frame>,
}

impl ScopeStack {
    /// A stack holding only the (empty) parameter frame
    pub fn new() -> Self {
        ScopeStack { frames: vec![Frame::default()] }
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    pub fn push(&mut self) {
        let visible = self.top().visible.clone();
        self.frames.push(Frame { visible, ..Frame::default() });
    }

    /// Close the innermost frame, handing its declarations to the parent
    pub fn pop(&mut self) {
        if self.frames.len() == 1 {
            return;
        }
        if let Some(closed) = self.frames.pop() {
            let parent = self.top_mut();
            for (name, node) in closed.declared.into_iter().chain(closed.declared_in_nested) {
                parent.declared_in_nested.entry(name).or_insert(node);
            }
        }
    }

    pub fn declare(&mut self, name: Symbol, variable: Variable) {
        let top = self.top_mut();
        top.declared.insert(name, variable.node);
        top.visible.insert(name, variable);
    }

    pub fn lookup(&self, name: Symbol) -> Option<&Variable> {
        self.top().visible.get(&name)
    }

    /// The definition of `name` in an already closed nested frame
    pub fn declared_in_nested(&self, name: Symbol) -> Option<NodeId> {
        self.top().declared_in_nested.get(&name).copied()
    }

    fn top(&self) -> &Frame {
        &self.frames[self.frames.len() - 1]
    }

    fn top_mut(&mut self) -> &mut Frame {
        let last = self.frames.len() - 1;
        &mut self.frames[last]
    }
}

impl Default for ScopeStack {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn local(node: u32) -> Variable {
        Variable { ty: Some(PlampType::Int), node: NodeId::from_raw(node), kind: VariableKind::Local }
    }

    #[test]
    fn test_inner_frame_sees_outer_names() {
        let mut scopes = ScopeStack::new();
        let a = Symbol::intern("a");
        scopes.declare(a, local(1));
        scopes.push();
        assert_eq!(scopes.lookup(a).map(|v| v.node), Some(NodeId::from_raw(1)));
        scopes.pop();
        assert_eq!(scopes.depth(), 1);
    }

    #[test]
    fn test_sibling_frames_are_isolated() {
        let mut scopes = ScopeStack::new();
        let a = Symbol::intern("a");
        scopes.push();
        scopes.declare(a, local(1));
        scopes.pop();
        scopes.push();
        assert!(scopes.lookup(a).is_none());
        assert_eq!(scopes.declared_in_nested(a), None);
        scopes.pop();
        assert_eq!(scopes.declared_in_nested(a), Some(NodeId::from_raw(1)));
    }

    #[test]
    fn test_nested_declarations_reach_grandparent() {
        let mut scopes = ScopeStack::new();
        let b = Symbol::intern("b");
        scopes.push();
        scopes.push();
        scopes.declare(b, local(4));
        scopes.pop();
        scopes.pop();
        assert_eq!(scopes.declared_in_nested(b), Some(NodeId::from_raw(4)));
    }

    #[test]
    fn test_parameter_frame_is_never_popped() {
        let mut scopes = ScopeStack::new();
        scopes.pop();
        assert_eq!(scopes.depth(), 1);
    }
}
