use insta::assert_snapshot;

use crate::node::{
    NodeArena, NodeType, PREC_LPAREN, PREC_OP_CAT, PREC_OP_OR, PREC_START, PREC_ZERO,
};

#[test]
fn operator_precedence_ordering() {
    assert!(PREC_START < PREC_LPAREN);
    assert!(PREC_LPAREN < PREC_OP_OR);
    assert!(PREC_OP_OR < PREC_OP_CAT);

    assert_eq!(NodeType::OpStart.precedence(), PREC_START);
    assert_eq!(NodeType::OpLParen.precedence(), PREC_LPAREN);
    assert_eq!(NodeType::OpOr.precedence(), PREC_OP_OR);
    assert_eq!(NodeType::OpCat.precedence(), PREC_OP_CAT);
    assert_eq!(NodeType::SetRef.precedence(), PREC_ZERO);
    assert_eq!(NodeType::OpStar.precedence(), PREC_ZERO);
}

#[test]
fn arena_allocation_and_links() {
    let mut arena = NodeArena::new();
    let cat = arena.alloc(NodeType::OpCat);
    let a = arena.alloc(NodeType::SetRef);
    let b = arena.alloc(NodeType::SetRef);
    assert_eq!(arena.len(), 3);

    arena.node_mut(cat).left = Some(a);
    arena.node_mut(cat).right = Some(b);
    arena.node_mut(a).parent = Some(cat);
    arena.node_mut(b).parent = Some(cat);

    assert_eq!(arena.node(cat).left, Some(a));
    assert_eq!(arena.node(a).parent, Some(cat));
    assert_eq!(arena.node(b).node_type, NodeType::SetRef);
}

#[test]
fn dump_renders_indented_tree() {
    let mut arena = NodeArena::new();
    let or = arena.alloc(NodeType::OpOr);
    let star = arena.alloc(NodeType::OpStar);
    let a = arena.alloc(NodeType::SetRef);
    let tag = arena.alloc(NodeType::Tag);

    arena.node_mut(a).text = String::from("[a-z]");
    arena.node_mut(tag).val = 42;
    arena.node_mut(star).left = Some(a);
    arena.node_mut(or).left = Some(star);
    arena.node_mut(or).right = Some(tag);
    arena.node_mut(or).rule_root = true;

    assert_snapshot!(arena.dump_tree(or), @r"
    opOr [root]
        opStar
            setRef [a-z]
        tag 42
    ");
}

#[test]
fn dump_does_not_expand_variable_definitions() {
    let mut arena = NodeArena::new();
    let var = arena.alloc(NodeType::VarRef);
    let def = arena.alloc(NodeType::SetRef);
    arena.node_mut(var).text = String::from("letters");
    arena.node_mut(var).left = Some(def);

    assert_snapshot!(arena.dump_tree(var), @"varRef $letters");
}
