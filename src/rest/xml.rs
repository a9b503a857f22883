/*
 * Copyright (c) 2025 Craig Hamilton and Contributors.
 * Licensed under either of
 *  - Apache License, Version 2.0 <http://www.apache.org/licenses/LICENSE-2.0> OR
 *  - MIT license <http://opensource.org/licenses/MIT>
 *  at your option.
 */
use crate::rest::errors::FlickrError;

/// Owned copy of one element of a decoded response.
///
/// Only the pieces the response builders read are kept: tag name, attributes,
/// direct text, and child elements.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct XmlElement {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub text: Option<String>,
    pub children: Vec<XmlElement>,
}

impl XmlElement {
    /// Parses a document and returns its root element
    pub fn parse(body: &str) -> Result<Self, FlickrError> {
        let doc = roxmltree::Document::parse(body).map_err(|err| FlickrError::InvalidXml {
            reason: err.to_string(),
            body: body.to_string(),
        })?;
        Ok(Self::from_node(doc.root_element()))
    }

    fn from_node(node: roxmltree::Node<'_, '_>) -> Self {
        let attributes = node
            .attributes()
            .map(|a| (a.name().to_string(), a.value().to_string()))
            .collect();

        // Text can be split around comments or CDATA, so join the direct text children.
        let mut text: Option<String> = None;
        for child in node.children().filter(|c| c.is_text()) {
            if let Some(t) = child.text() {
                text.get_or_insert_with(String::new).push_str(t);
            }
        }

        let children = node
            .children()
            .filter(|c| c.is_element())
            .map(Self::from_node)
            .collect();

        Self {
            name: node.tag_name().name().to_string(),
            attributes,
            text,
            children,
        }
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn required_attr(&self, name: &str) -> Result<&str, FlickrError> {
        self.attr(name).ok_or_else(|| {
            FlickrError::UnexpectedResponse(format!(
                "<{}> is missing attribute {:?}",
                self.name, name
            ))
        })
    }

    /// Parses a required attribute into a number (or anything else `FromStr`)
    pub fn parsed_attr<T: std::str::FromStr>(&self, name: &str) -> Result<T, FlickrError> {
        let raw = self.required_attr(name)?;
        raw.trim().parse::<T>().map_err(|_| {
            FlickrError::UnexpectedResponse(format!(
                "<{}> attribute {:?} has unexpected value {:?}",
                self.name, name, raw
            ))
        })
    }

    /// First direct child with the given tag
    pub fn child(&self, name: &str) -> Option<&XmlElement> {
        self.children.iter().find(|c| c.name == name)
    }

    pub fn required_child(&self, name: &str) -> Result<&XmlElement, FlickrError> {
        self.child(name).ok_or_else(|| {
            FlickrError::UnexpectedResponse(format!("<{}> has no <{}> element", self.name, name))
        })
    }

    /// All direct children with the given tag, in document order
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a XmlElement> {
        self.children.iter().filter(move |c| c.name == name)
    }

    /// First element with the given tag anywhere below this one (depth first)
    pub fn descendant(&self, name: &str) -> Option<&XmlElement> {
        self.children.iter().find_map(|c| {
            if c.name == name {
                Some(c)
            } else {
                c.descendant(name)
            }
        })
    }

    pub fn required_descendant(&self, name: &str) -> Result<&XmlElement, FlickrError> {
        self.descendant(name).ok_or_else(|| {
            FlickrError::UnexpectedResponse(format!(
                "<{}> has no descendant <{}> element",
                self.name, name
            ))
        })
    }

    /// All elements with the given tag anywhere below this one, in document order
    pub fn descendants_named<'a>(&'a self, name: &str) -> Vec<&'a XmlElement> {
        let mut found = Vec::new();
        self.collect_named(name, &mut found);
        found
    }

    fn collect_named<'a>(&'a self, name: &str, found: &mut Vec<&'a XmlElement>) {
        for child in &self.children {
            if child.name == name {
                found.push(child);
            }
            child.collect_named(name, found);
        }
    }

    /// The text of this element, with an absent or empty body mapped to `None`
    pub fn text_or_none(&self) -> Option<&str> {
        self.text.as_deref().filter(|t| !t.is_empty())
    }

    /// Text of a direct child, or `None` if the child is missing or empty
    pub fn optional_child_text(&self, name: &str) -> Option<&str> {
        self.child(name).and_then(|c| c.text_or_none())
    }

    pub fn required_child_text(&self, name: &str) -> Result<&str, FlickrError> {
        self.required_child(name)?.text_or_none().ok_or_else(|| {
            FlickrError::UnexpectedResponse(format!(
                "<{}> has an empty <{}> element",
                self.name, name
            ))
        })
    }
}
