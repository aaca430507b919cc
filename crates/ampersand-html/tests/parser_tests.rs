//! Integration tests for the HTML tree builder.

use ampersand_dom::{DomTree, NodeId, NodeType};
use ampersand_html::{HTMLParser, HTMLTokenizer, parse_html};

/// Helper to parse HTML and return the DOM tree
fn parse(html: &str) -> DomTree {
    let mut tokenizer = HTMLTokenizer::new(html);
    tokenizer.run();
    HTMLParser::new(tokenizer.into_tokens()).run()
}

/// Helper to get the first element with a tag name, depth-first
fn find_element(tree: &DomTree, tag: &str) -> NodeId {
    tree.first_descendant_element(NodeId::ROOT, tag)
        .unwrap_or_else(|| panic!("no <{tag}> in tree"))
}

/// Tag names of the element children of `id`
fn child_tags(tree: &DomTree, id: NodeId) -> Vec<String> {
    tree.children(id)
        .iter()
        .filter_map(|&c| tree.as_element(c))
        .map(|e| e.tag_name.clone())
        .collect()
}

#[test]
fn test_elements_nest_and_text_merges() {
    let tree = parse("<div id=x>Hello <b>big</b> world</div>");
    let div = find_element(&tree, "div");
    assert_eq!(tree.parent(div), Some(NodeId::ROOT));
    assert_eq!(tree.text_content(div), "Hello big world");
    // "Hello " is a single text node despite arriving one character at a time.
    assert_eq!(tree.children(div).len(), 3);
    assert_eq!(tree.as_text(tree.children(div)[0]), Some("Hello "));
}

#[test]
fn test_doctype_and_leading_whitespace_are_dropped() {
    let tree = parse("<!DOCTYPE html>\n  <p>x</p>");
    assert_eq!(child_tags(&tree, NodeId::ROOT), vec!["p"]);
    assert_eq!(tree.children(NodeId::ROOT).len(), 1);
}

#[test]
fn test_comment_node() {
    let tree = parse("<div><!-- note --></div>");
    let div = find_element(&tree, "div");
    let comment = tree.children(div)[0];
    assert!(matches!(
        tree.get(comment).map(|n| &n.node_type),
        Some(NodeType::Comment(data)) if data == " note "
    ));
}

#[test]
fn test_void_elements_are_not_parents() {
    let tree = parse("<p>a<br>b<img src=x>c</p>");
    let p = find_element(&tree, "p");
    assert_eq!(child_tags(&tree, p), vec!["br", "img"]);
    assert_eq!(tree.text_content(p), "abc");
}

#[test]
fn test_table_cells_close_implicitly() {
    let tree = parse(
        "<table><tbody>\
         <tr id=r1><td> <code>amp;</code> <td> U+00026 <td> <span class=glyph>&amp;</span>\
         <tr id=r2><td> <code>lt;</code> <td> U+0003C <td> <span class=glyph>&lt;</span>\
         </table><p>after",
    );
    let tbody = find_element(&tree, "tbody");
    assert_eq!(child_tags(&tree, tbody), vec!["tr", "tr"]);

    let rows = tree.child_elements_named(tbody, "tr");
    for &row in &rows {
        assert_eq!(child_tags(&tree, row), vec!["td", "td", "td"]);
    }
    let cells = tree.child_elements_named(rows[0], "td");
    assert_eq!(tree.text_content(cells[0]).trim(), "amp;");
    assert_eq!(tree.text_content(cells[1]).trim(), "U+00026");
    assert_eq!(tree.text_content(cells[2]).trim(), "&");
    let cells = tree.child_elements_named(rows[1], "td");
    assert_eq!(tree.text_content(cells[2]).trim(), "<");

    // </table> closed the open cell, row and section.
    let p = find_element(&tree, "p");
    assert_eq!(tree.parent(p), Some(NodeId::ROOT));
}

#[test]
fn test_table_sections_close_each_other() {
    let tree = parse(
        "<table><thead><tr><th>Name<th>Character<tbody><tr><td>a<td>b</table>",
    );
    let table = find_element(&tree, "table");
    assert_eq!(child_tags(&tree, table), vec!["thead", "tbody"]);
}

#[test]
fn test_nested_table_stays_inside_cell() {
    let tree = parse(
        "<table id=outer><tr><td><table id=inner><tr><td>x</table><td>y</table>",
    );
    let outer = tree.elements_with_id("outer")[0];
    let inner = tree.elements_with_id("inner")[0];
    let outer_row = tree.child_elements_named(outer, "tr")[0];
    assert_eq!(tree.child_elements_named(outer_row, "td").len(), 2);
    assert_eq!(tree.ancestors(inner).nth(1), Some(outer_row));
}

#[test]
fn test_list_items_and_paragraphs_close_implicitly() {
    let tree = parse("<ul><li>one<li>two</ul><p>a<p>b<div>c</div>");
    let ul = find_element(&tree, "ul");
    assert_eq!(child_tags(&tree, ul), vec!["li", "li"]);
    assert_eq!(child_tags(&tree, NodeId::ROOT), vec!["ul", "p", "p", "div"]);
}

#[test]
fn test_stray_end_tag_is_reported_and_ignored() {
    let (tree, issues) = parse_html("<div>a</span>b</div>");
    let div = find_element(&tree, "div");
    assert_eq!(tree.text_content(div), "ab");
    assert_eq!(issues.len(), 1);
    assert!(issues[0].message.contains("</span>"));
    assert_eq!(issues[0].token_index, 2);
}

#[test]
fn test_end_tag_does_not_escape_cell() {
    let (tree, issues) = parse_html("<div><table><tr><td>x</div>y</table></div>");
    let td = find_element(&tree, "td");
    assert_eq!(tree.text_content(td), "xy");
    assert_eq!(issues.len(), 1);
}
