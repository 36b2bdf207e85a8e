//! Small helpers for building and serializing rcdom trees.

use crate::error::Error;
use html5ever::{
    ns, serialize, serialize::SerializeOpts, serialize::TraversalScope, Attribute, LocalName,
    QualName,
};
use markup5ever_rcdom::{Handle, Node, NodeData, SerializableHandle};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// Create an HTML element with attributes.
pub(crate) fn create_element(tag: &str, attrs: Vec<(&str, &str)>) -> Handle {
    let attributes = attrs
        .into_iter()
        .map(|(name, value)| Attribute {
            name: QualName::new(None, ns!(), LocalName::from(name)),
            value: value.to_string().into(),
        })
        .collect();

    Rc::new(Node {
        parent: Cell::new(None),
        children: RefCell::new(Vec::new()),
        data: NodeData::Element {
            name: QualName::new(None, ns!(html), LocalName::from(tag)),
            attrs: RefCell::new(attributes),
            template_contents: Default::default(),
            mathml_annotation_xml_integration_point: false,
        },
    })
}

pub(crate) fn create_text(text: &str) -> Handle {
    Rc::new(Node {
        parent: Cell::new(None),
        children: RefCell::new(Vec::new()),
        data: NodeData::Text {
            contents: RefCell::new(text.to_string().into()),
        },
    })
}

pub(crate) fn append(parent: &Handle, child: Handle) {
    parent.children.borrow_mut().push(child);
}

pub(crate) fn append_all(parent: &Handle, children: impl IntoIterator<Item = Handle>) {
    parent.children.borrow_mut().extend(children);
}

/// Element with a single text child.
pub(crate) fn text_element(tag: &str, attrs: Vec<(&str, &str)>, text: &str) -> Handle {
    let element = create_element(tag, attrs);
    append(&element, create_text(text));
    element
}

pub(crate) fn is_element(node: &Handle, tag: &str) -> bool {
    matches!(&node.data, NodeData::Element { name, .. } if &*name.local == tag)
}

/// Serialize each node, including the node itself, and concatenate.
pub fn serialize_nodes(nodes: &[Handle]) -> Result<String, Error> {
    let mut output = Vec::new();
    let opts = SerializeOpts {
        traversal_scope: TraversalScope::IncludeNode,
        ..Default::default()
    };
    for node in nodes {
        let serializable = SerializableHandle::from(node.clone());
        serialize(&mut output, &serializable, opts.clone())
            .map_err(|e| Error::Render(format!("HTML serialization failed: {e}")))?;
    }
    String::from_utf8(output).map_err(|e| Error::Render(format!("UTF-8 conversion failed: {e}")))
}

/// Escape text for interpolation into hand-written markup.
pub(crate) fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
