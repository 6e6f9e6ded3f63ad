//! Some utility functions

use minidom::Element;

use crate::tree::OrganizerTree;

/// Walks an XML tree and returns every element that has the given name
pub fn find_elems<S: AsRef<str>>(root: &Element, searched_name: S) -> Vec<&Element> {
    let searched_name = searched_name.as_ref();
    let mut elems: Vec<&Element> = Vec::new();

    for el in root.children() {
        if el.name() == searched_name {
            elems.push(el);
        } else {
            let ret = find_elems(el, searched_name);
            elems.extend(ret);
        }
    }
    elems
}

/// Walks an XML tree until it finds an elements with the given name
pub fn find_elem<S: AsRef<str>>(root: &Element, searched_name: S) -> Option<&Element> {
    let searched_name = searched_name.as_ref();
    if root.name() == searched_name {
        return Some(root);
    }

    for el in root.children() {
        if el.name() == searched_name {
            return Some(el);
        } else {
            let ret = find_elem(el, searched_name);
            if ret.is_some() {
                return ret;
            }
        }
    }
    None
}

/// A debug utility that pretty-prints an organizer tree
pub fn print_tree(tree: &OrganizerTree) {
    println!("{}", tree.root().name());
    for node in tree.depth_first() {
        let mut depth = 0;
        let mut parent = node.parent();
        while let Some(parent_id) = parent {
            depth += 1;
            parent = tree.get(parent_id).and_then(|p| p.parent());
        }
        let link = if node.is_link() { "@" } else { " " };
        println!("{}{} {}\t{}", "    ".repeat(depth), link, node.name(), node.id());
    }
}
