//! Attribute lookup and removal on element nodes.

use flexi_syntax::ast::{AttrNode, ElementNode};

/// The first attribute named `name`.
pub fn get_attribute<'e>(element: &'e ElementNode, name: &str) -> Option<&'e AttrNode> {
    element.attributes.iter().find(|attr| attr.name == name)
}

pub fn get_attribute_mut<'e>(element: &'e mut ElementNode, name: &str) -> Option<&'e mut AttrNode> {
    element.attributes.iter_mut().find(|attr| attr.name == name)
}

pub fn has_attribute(element: &ElementNode, name: &str) -> bool {
    get_attribute(element, name).is_some()
}

/// Remove the first attribute named `name`, preserving the order of the rest.
pub fn remove_attribute(element: &mut ElementNode, name: &str) -> Option<AttrNode> {
    let index = element.attributes.iter().position(|attr| attr.name == name)?;
    Some(element.attributes.remove(index))
}

#[cfg(test)]
mod tests {
    use super::*;
    use flexi_syntax::parse_str;

    fn element(src: &str) -> ElementNode {
        let template = parse_str(src).unwrap();
        let id = template.children(template.root())[0];
        template.element(id).unwrap().clone()
    }

    #[test]
    fn finds_first_match() {
        let el = element(r#"<box sm="1" sm="2" vertical></box>"#);
        assert_eq!(get_attribute(&el, "sm").and_then(|a| a.value.chars()), Some("1"));
        assert!(has_attribute(&el, "vertical"));
        assert!(get_attribute(&el, "md").is_none());
    }

    #[test]
    fn removes_and_keeps_order() {
        let mut el = element(r#"<box a b c></box>"#);
        let removed = remove_attribute(&mut el, "b").unwrap();
        assert_eq!(removed.name, "b");
        let names: Vec<_> = el.attributes.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, ["a", "c"]);
        assert!(remove_attribute(&mut el, "b").is_none());
    }

    #[test]
    fn mutates_in_place() {
        let mut el = element(r#"<box class="x"></box>"#);
        if let Some(attr) = get_attribute_mut(&mut el, "class") {
            attr.name = "data-class".into();
        }
        assert!(has_attribute(&el, "data-class"));
    }
}
