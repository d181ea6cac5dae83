use blocklang::block::{Block, BlockId, ConditionKind, FlowKind};
use blocklang::builder::build_tree;
use blocklang::node::{NO_SOURCE, Node, NodeKind};
use blocklang::parser::Parser;

// ---------------------------------------------------------------------------
// Block constructors
// ---------------------------------------------------------------------------

fn var(id: BlockId, name: &str, ty: &str, value: &str) -> Block {
    Block::Variable {
        id,
        name: name.to_string(),
        declared_type: ty.to_string(),
        value: value.to_string(),
    }
}

fn out(id: BlockId, value: &str) -> Block {
    Block::Output {
        id,
        value: value.to_string(),
    }
}

fn ret(id: BlockId, value: &str) -> Block {
    Block::Returning {
        id,
        value: value.to_string(),
    }
}

fn lp(id: BlockId, header: &str) -> Block {
    Block::Loop {
        id,
        header: header.to_string(),
    }
}

fn cond(id: BlockId, kind: ConditionKind, condition: &str) -> Block {
    Block::Condition {
        id,
        kind,
        condition: condition.to_string(),
    }
}

fn func(id: BlockId, signature: &str) -> Block {
    Block::Function {
        id,
        signature: signature.to_string(),
    }
}

fn begin() -> Block {
    Block::Flow(FlowKind::Begin)
}

fn end() -> Block {
    Block::Flow(FlowKind::End)
}

// ---------------------------------------------------------------------------
// Tree builder: shapes
// ---------------------------------------------------------------------------

#[test]
fn empty_input_yields_bare_root() {
    let root = build_tree(&[]);
    assert_eq!(root.kind, NodeKind::Root);
    assert_eq!(root.source_id, NO_SOURCE);
    assert!(root.children.is_empty());
}

#[test]
fn assignment_builds_name_and_value_children() {
    let root = build_tree(&[var(1, "x", "Int", "5"), out(2, "x")]);

    assert_eq!(root.children.len(), 2);

    let assign = &root.children[0];
    assert_eq!(assign.kind, NodeKind::Assign);
    assert_eq!(assign.payload, "Int");
    assert_eq!(assign.source_id, 1);
    assert_eq!(assign.children.len(), 2);
    assert_eq!(assign.children[0].kind, NodeKind::VariableRef);
    assert_eq!(assign.children[0].payload, "x");
    assert_eq!(assign.children[1].kind, NodeKind::Expression);
    assert_eq!(assign.children[1].payload, "5");

    let print = &root.children[1];
    assert_eq!(print.kind, NodeKind::Print);
    assert_eq!(print.payload, "x");
    assert_eq!(print.source_id, 2);
    assert!(print.children.is_empty());
}

#[test]
fn return_at_top_level_builds_a_leaf() {
    let root = build_tree(&[ret(1, "x + 1")]);
    assert_eq!(root.children.len(), 1);
    assert_eq!(root.children[0].kind, NodeKind::ReturnFunction);
    assert_eq!(root.children[0].payload, "x + 1");
    assert_eq!(root.children[0].source_id, 1);
}

#[test]
fn single_if_arm_owns_its_body() {
    let root = build_tree(&[cond(1, ConditionKind::If, "x > 0"), begin(), out(2, "pos"), end()]);

    assert_eq!(root.children.len(), 1);
    let arm = &root.children[0];
    assert_eq!(arm.kind, NodeKind::IfBlock);
    assert_eq!(arm.payload, "x > 0");
    assert_eq!(arm.source_id, 1);
    assert_eq!(arm.children.len(), 1);
    assert_eq!(arm.children[0].kind, NodeKind::Print);
    assert_eq!(arm.children[0].payload, "pos");
}

#[test]
fn if_and_else_become_siblings() {
    let root = build_tree(&[
        cond(1, ConditionKind::If, "x > 0"),
        begin(),
        end(),
        cond(2, ConditionKind::Else, ""),
        begin(),
        out(3, "neg"),
        end(),
    ]);

    assert_eq!(root.children.len(), 2);
    assert_eq!(root.children[0].kind, NodeKind::IfBlock);
    assert!(root.children[0].children.is_empty());
    assert_eq!(root.children[1].kind, NodeKind::ElseBlock);
    assert_eq!(root.children[1].children.len(), 1);
    assert_eq!(root.children[1].children[0].payload, "neg");
}

#[test]
fn chain_arms_keep_source_order_and_kinds() {
    let root = build_tree(&[
        cond(1, ConditionKind::If, "a"),
        begin(),
        end(),
        cond(2, ConditionKind::Elif, "b"),
        begin(),
        end(),
        cond(3, ConditionKind::Elif, "c"),
        begin(),
        end(),
        cond(4, ConditionKind::Else, ""),
        begin(),
        end(),
    ]);

    let kinds: Vec<NodeKind> = root.children.iter().map(|c| c.kind).collect();
    assert_eq!(
        kinds,
        vec![
            NodeKind::IfBlock,
            NodeKind::ElifBlock,
            NodeKind::ElifBlock,
            NodeKind::ElseBlock,
        ]
    );
    let ids: Vec<_> = root.children.iter().map(|c| c.source_id).collect();
    assert_eq!(ids, vec![1, 2, 3, 4]);
}

#[test]
fn condition_nested_in_loop() {
    let root = build_tree(&[
        lp(1, "i in 1...3"),
        begin(),
        cond(2, ConditionKind::If, "i > 1"),
        begin(),
        out(3, "i"),
        end(),
        end(),
    ]);

    assert_eq!(root.children.len(), 1);
    let loop_node = &root.children[0];
    assert_eq!(loop_node.kind, NodeKind::Loop);
    assert_eq!(loop_node.payload, "i in 1...3");
    assert_eq!(loop_node.children.len(), 1);

    let arm = &loop_node.children[0];
    assert_eq!(arm.kind, NodeKind::IfBlock);
    assert_eq!(arm.payload, "i > 1");
    assert_eq!(arm.children.len(), 1);
    assert_eq!(arm.children[0].kind, NodeKind::Print);
    assert_eq!(arm.children[0].payload, "i");
}

#[test]
fn function_body_with_return() {
    let root = build_tree(&[func(1, "double(n: Int)"), begin(), ret(2, "n * 2"), end()]);

    assert_eq!(root.children.len(), 1);
    let f = &root.children[0];
    assert_eq!(f.kind, NodeKind::Function);
    assert_eq!(f.payload, "double(n: Int)");
    assert_eq!(f.children.len(), 1);
    assert_eq!(f.children[0].kind, NodeKind::ReturnFunction);
    assert_eq!(f.children[0].payload, "n * 2");
}

#[test]
fn four_levels_of_nesting() {
    let root = build_tree(&[
        func(1, "main()"),
        begin(),
        lp(2, "i in 1...2"),
        begin(),
        cond(3, ConditionKind::If, "i == 1"),
        begin(),
        out(4, "one"),
        end(),
        end(),
        end(),
    ]);

    let f = &root.children[0];
    let l = &f.children[0];
    let arm = &l.children[0];
    let leaf = &arm.children[0];
    assert_eq!(f.kind, NodeKind::Function);
    assert_eq!(l.kind, NodeKind::Loop);
    assert_eq!(arm.kind, NodeKind::IfBlock);
    assert_eq!(leaf.kind, NodeKind::Print);
    assert_eq!(leaf.payload, "one");
    assert_eq!(leaf.source_id, 4);
}

// ---------------------------------------------------------------------------
// Tree builder: malformed input
// ---------------------------------------------------------------------------

#[test]
fn loop_without_end_is_dropped() {
    let root = build_tree(&[lp(1, "i in 1...3"), begin(), out(2, "a")]);
    assert!(root.children.is_empty());
}

#[test]
fn statements_before_a_broken_construct_survive() {
    let root = build_tree(&[out(1, "x"), cond(2, ConditionKind::If, "c"), begin(), out(3, "a")]);
    assert_eq!(root.children.len(), 1);
    assert_eq!(root.children[0].kind, NodeKind::Print);
    assert_eq!(root.children[0].payload, "x");
}

#[test]
fn broken_inner_construct_keeps_the_enclosing_one() {
    // The loop's extent balances, but the condition inside it hits the
    // loop's own end delimiter before finding a begin of its own.
    let root = build_tree(&[
        out(1, "a"),
        lp(2, "i in 1...3"),
        begin(),
        cond(3, ConditionKind::If, "c"),
        end(),
    ]);

    assert_eq!(root.children.len(), 2);
    assert_eq!(root.children[0].kind, NodeKind::Print);
    let loop_node = &root.children[1];
    assert_eq!(loop_node.kind, NodeKind::Loop);
    assert!(loop_node.children.is_empty());
}

#[test]
fn stray_delimiters_at_top_level_are_skipped() {
    let root = build_tree(&[end(), out(1, "x"), end()]);
    assert_eq!(root.children.len(), 1);
    assert_eq!(root.children[0].kind, NodeKind::Print);
}

// ---------------------------------------------------------------------------
// Tree builder: properties
// ---------------------------------------------------------------------------

fn nested_program() -> Vec<Block> {
    vec![
        var(1, "x", "Int", "0"),
        lp(2, "i in 1...3"),
        begin(),
        cond(3, ConditionKind::If, "i > 1"),
        begin(),
        var(4, "x", "", "x + i"),
        out(5, "x"),
        end(),
        cond(6, ConditionKind::Else, ""),
        begin(),
        out(7, "i"),
        end(),
        end(),
        func(8, "f()"),
        begin(),
        ret(9, "x"),
        end(),
    ]
}

#[test]
fn building_twice_is_idempotent() {
    let blocks = nested_program();
    assert_eq!(build_tree(&blocks), build_tree(&blocks));
}

/// Collect leaf source ids depth-first, in child order.
fn flatten_leaves(node: &Node, out: &mut Vec<BlockId>) {
    match node.kind {
        NodeKind::Assign | NodeKind::Print | NodeKind::ReturnFunction => {
            out.push(node.source_id);
        }
        _ => {
            for child in &node.children {
                flatten_leaves(child, out);
            }
        }
    }
}

#[test]
fn depth_first_leaves_preserve_source_order() {
    let blocks = nested_program();
    let expected: Vec<BlockId> = blocks
        .iter()
        .filter_map(|b| match b {
            Block::Variable { id, .. }
            | Block::Output { id, .. }
            | Block::Returning { id, .. } => Some(*id),
            _ => None,
        })
        .collect();

    let root = build_tree(&blocks);
    let mut actual = Vec::new();
    flatten_leaves(&root, &mut actual);
    assert_eq!(actual, expected);
}

/// Reference bracket matcher, written independently of the builder.
fn reference_matching_end(blocks: &[Block], start: usize) -> Option<usize> {
    let mut depth = 0i64;
    for (i, block) in blocks.iter().enumerate().skip(start) {
        match block {
            Block::Flow(FlowKind::Begin) => depth += 1,
            Block::Flow(FlowKind::End) => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
                if depth < 0 {
                    return None;
                }
            }
            _ => {}
        }
    }
    None
}

#[test]
fn compound_extent_matches_reference_counter() {
    let blocks = nested_program();

    // The loop header sits at index 1; its slice should cover everything up
    // to the reference matcher's end, so its subtree must contain exactly
    // the leaf blocks of that range.
    let end = reference_matching_end(&blocks, 2).expect("program is balanced");
    let expected_leaves = blocks[2..end]
        .iter()
        .filter(|b| {
            matches!(
                b,
                Block::Variable { .. } | Block::Output { .. } | Block::Returning { .. }
            )
        })
        .count();

    let root = build_tree(&blocks);
    let loop_node = &root.children[1];
    assert_eq!(loop_node.kind, NodeKind::Loop);
    let mut leaves = Vec::new();
    flatten_leaves(loop_node, &mut leaves);
    assert_eq!(leaves.len(), expected_leaves);
}

// ---------------------------------------------------------------------------
// Listing parser
// ---------------------------------------------------------------------------

fn parse(source: &str) -> Vec<Block> {
    Parser::new(source.to_string(), 0)
        .parse()
        .expect("listing should parse")
        .blocks
}

#[test]
fn listing_covers_every_block_kind() {
    let blocks = parse(
        "let x: Int = 5\n\
         print x\n\
         loop i in 1...3\n\
         begin\n\
         if i > 1\n\
         begin\n\
         end\n\
         elif i == 1\n\
         begin\n\
         end\n\
         else\n\
         begin\n\
         end\n\
         end\n\
         func f(n: Int)\n\
         begin\n\
         return n\n\
         end\n",
    );

    assert_eq!(
        blocks,
        vec![
            var(1, "x", "Int", "5"),
            out(2, "x"),
            lp(3, "i in 1...3"),
            begin(),
            cond(4, ConditionKind::If, "i > 1"),
            begin(),
            end(),
            cond(5, ConditionKind::Elif, "i == 1"),
            begin(),
            end(),
            cond(6, ConditionKind::Else, ""),
            begin(),
            end(),
            end(),
            func(7, "f(n: Int)"),
            begin(),
            ret(8, "n"),
            end(),
        ]
    );
}

#[test]
fn ids_are_sequential_and_skip_delimiters() {
    let blocks = parse("let a = 1\nbegin\nend\nprint a\n");
    assert_eq!(blocks[0], var(1, "a", "", "1"));
    assert_eq!(blocks[3], out(2, "a"));
}

#[test]
fn comments_and_blank_lines_are_skipped() {
    let blocks = parse("# header comment\n\n  print x\n\n# trailing\n");
    assert_eq!(blocks, vec![out(1, "x")]);
}

#[test]
fn value_text_is_carried_verbatim() {
    let blocks = parse("let msg = \"a = b\" + suffix\n");
    assert_eq!(blocks, vec![var(1, "msg", "", "\"a = b\" + suffix")]);
}

#[test]
fn unknown_statement_is_an_error_with_span() {
    let errors = Parser::new("print x\nfrobnicate y\n".to_string(), 7)
        .parse()
        .unwrap_err();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].message.contains("unknown statement"));
    assert_eq!(errors[0].file_id, 7);
    assert_eq!(errors[0].span, 8..20);
    assert!(!errors[0].notes.is_empty());
}

#[test]
fn all_errors_are_collected() {
    let errors = Parser::new("let x\nelse now\nloop\n".to_string(), 0)
        .parse()
        .unwrap_err();
    let messages: Vec<&str> = errors.iter().map(|e| e.message.as_str()).collect();
    assert_eq!(
        messages,
        vec![
            "expected '=' in variable declaration",
            "unexpected text after 'else'",
            "missing loop header",
        ]
    );
}

#[test]
fn if_without_condition_is_an_error() {
    let errors = Parser::new("if\n".to_string(), 0).parse().unwrap_err();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].message.contains("missing condition"));
}

// ---------------------------------------------------------------------------
// End to end
// ---------------------------------------------------------------------------

#[test]
fn listing_to_rendered_tree() {
    let source = "let x: Int = 5\n\
                  if x > 0\n\
                  begin\n\
                  print x\n\
                  end\n\
                  else\n\
                  begin\n\
                  print 0 - x\n\
                  end\n";
    let program = Parser::new(source.to_string(), 0).parse().unwrap();
    let tree = build_tree(&program.blocks);

    let expected = "\
root
  assign \"Int\" #1
    variableRef \"x\" #1
    expression \"5\" #1
  ifBlock \"x > 0\" #2
    print \"x\" #3
  elseBlock #4
    print \"0 - x\" #5
";
    assert_eq!(tree.to_string(), expected);
}
