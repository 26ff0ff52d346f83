//! Example: build, edit and move a small document
//!
//! Run with `RUST_LOG=fos_dom_core=trace` to see tree events.

use fos_dom_core::{DocumentPosition, DomResult, DomTree, NodeId};
use tracing_subscriber::EnvFilter;

fn print_tree(tree: &DomTree, node: NodeId, depth: usize) {
    let name = tree.node_name(node).unwrap_or_default();
    let attrs: Vec<String> = tree
        .attributes(node)
        .iter()
        .filter_map(|&a| Some(format!("{}={:?}", tree.node_name(a)?, tree.node_value(a)?)))
        .collect();
    match tree.data(node) {
        Some(data) => println!("{}{} {:?}", "  ".repeat(depth), name, data),
        None => println!("{}{} {}", "  ".repeat(depth), name, attrs.join(" ")),
    }
    for child in tree.children(node) {
        print_tree(tree, child, depth + 1);
    }
}

fn main() -> DomResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut tree = DomTree::new();
    let blank = tree.create_document()?;
    let doc = tree
        .implementation(blank)?
        .create_document(&mut tree, None, "library", None)?;
    let library = tree.document_element(doc).unwrap_or(doc);

    for (title, year) in [("Dune", "1965"), ("Hyperion", "1989")] {
        let book = tree.create_element(doc, "book")?;
        tree.set_attribute(book, "year", year)?;
        let text = tree.create_text_node(doc, title)?;
        tree.append_child(book, text)?;
        tree.append_child(library, book)?;
    }

    let note = tree.create_comment(doc, "catalogue")?;
    tree.prepend(library, &[note])?;

    println!("fOS DOM Core v{}", fos_dom_core::VERSION);
    print_tree(&tree, doc, 0);

    let books = tree.get_elements_by_tag_name(doc, "book");
    if let &[first, second] = books.as_slice() {
        let position = tree.compare_document_position(first, second);
        println!("second book follows first: {}", position.contains(DocumentPosition::FOLLOWING));
    }

    // Move the library into a fresh document
    let archive = tree.create_document()?;
    tree.adopt_node(archive, library)?;
    tree.append_child(archive, library)?;
    println!("text: {}", tree.text_content(library).unwrap_or_default());

    tree.release(blank)?;
    tree.release(doc)?;
    println!("live nodes: {}", tree.len());
    Ok(())
}
