use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
};

use quick_xml::{
    events::{BytesStart, BytesText, Event},
    Reader,
};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum XmlParseError {
    #[error(transparent)]
    Xml(#[from] quick_xml::Error),
    #[error("element <{0}> is never closed")]
    UnclosedElement(String),
    #[error("end tag </{0}> found without start tag")]
    EndTagWithoutStartTag(String),
    #[error("multiple root elements found")]
    MultipleRoots,
}

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("could not read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("could not parse {path}: {source}")]
    Parse {
        path: String,
        source: XmlParseError,
    },
}

#[derive(Debug, Clone)]
enum Node {
    Element(usize),
    Text(String),
}

#[derive(Debug, Clone)]
struct ElementData {
    name: String,
    attributes: Vec<(String, String)>,
    parent: Option<usize>,
    nodes: Vec<Node>,
}

/// Read-only element tree of one XML file.
///
/// Names are stored without namespace prefixes. Elements are kept in
/// document order, so an element's index is also its position in a
/// pre-order walk of the tree.
#[derive(Debug, Clone, Default)]
pub struct XmlDocument {
    source: String,
    elements: Vec<ElementData>,
    root: Option<usize>,
}

impl XmlDocument {
    pub fn load<T: AsRef<Path>>(path: T) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let display_path = path.display().to_string();
        let file = File::open(path).map_err(|source| LoadError::Io {
            path: display_path.clone(),
            source,
        })?;
        Self::parse(BufReader::new(file), display_path.as_str()).map_err(|source| {
            LoadError::Parse {
                path: display_path,
                source,
            }
        })
    }

    pub fn parse<R: BufRead, S: Into<String>>(xml: R, source: S) -> Result<Self, XmlParseError> {
        let mut builder = TreeBuilder::default();
        let mut reader = Reader::from_reader(xml);

        let mut buf = Vec::new();
        loop {
            if builder
                .match_event(reader.read_event_into(&mut buf)?)?
                .is_none()
            {
                break;
            }
            buf.clear();
        }

        if let Some(open) = builder.open.last() {
            return Err(XmlParseError::UnclosedElement(
                builder.elements[*open].name.clone(),
            ));
        }

        Ok(Self {
            source: source.into(),
            elements: builder.elements,
            root: builder.root,
        })
    }

    pub fn parse_str<S: Into<String>>(xml: &str, source: S) -> Result<Self, XmlParseError> {
        Self::parse(xml.as_bytes(), source)
    }

    /// Where the document was read from, used to name it in errors.
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn root(&self) -> Option<Element<'_>> {
        self.root.map(|index| self.element(index))
    }

    /// Every element named `name`, the root included, in document order.
    pub fn descendants<'a>(&'a self, name: &'a str) -> Descendants<'a> {
        Descendants {
            document: self,
            name,
            stack: self.root.into_iter().collect(),
        }
    }

    fn element(&self, index: usize) -> Element<'_> {
        Element {
            document: self,
            index,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Element<'a> {
    document: &'a XmlDocument,
    index: usize,
}

impl<'a> Element<'a> {
    pub fn name(&self) -> &'a str {
        &self.data().name
    }

    pub fn attribute(&self, name: &str) -> Option<&'a str> {
        self.data()
            .attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Concatenated text of this element and all of its descendants.
    pub fn value(&self) -> String {
        let mut value = String::new();
        self.push_value(&mut value);
        value
    }

    pub fn parent(&self) -> Option<Element<'a>> {
        self.data()
            .parent
            .map(|index| self.document.element(index))
    }

    pub fn children(&self) -> impl Iterator<Item = Element<'a>> + 'a {
        let document = self.document;
        self.child_indices().map(move |index| document.element(index))
    }

    pub fn children_named(&self, name: &'a str) -> impl Iterator<Item = Element<'a>> + 'a {
        self.children().filter(move |child| child.name() == name)
    }

    /// First child element named `name`.
    pub fn child(&self, name: &'a str) -> Option<Element<'a>> {
        self.children_named(name).next()
    }

    /// Elements named `name` below this one, in document order.
    pub fn descendants(&self, name: &'a str) -> Descendants<'a> {
        let mut stack: Vec<usize> = self.child_indices().collect();
        stack.reverse();
        Descendants {
            document: self.document,
            name,
            stack,
        }
    }

    /// Enclosing elements named `name`, nearest first.
    pub fn ancestors(&self, name: &'a str) -> impl Iterator<Item = Element<'a>> + 'a {
        std::iter::successors(self.parent(), |element| element.parent())
            .filter(move |element| element.name() == name)
    }

    fn data(&self) -> &'a ElementData {
        &self.document.elements[self.index]
    }

    fn child_indices(&self) -> impl DoubleEndedIterator<Item = usize> + 'a {
        self.data().nodes.iter().filter_map(|node| match node {
            Node::Element(index) => Some(*index),
            Node::Text(_) => None,
        })
    }

    fn push_value(&self, value: &mut String) {
        for node in &self.data().nodes {
            match node {
                Node::Text(text) => value.push_str(text),
                Node::Element(index) => self.document.element(*index).push_value(value),
            }
        }
    }
}

pub struct Descendants<'a> {
    document: &'a XmlDocument,
    name: &'a str,
    stack: Vec<usize>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = Element<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(index) = self.stack.pop() {
            let element = self.document.element(index);
            self.stack.extend(element.child_indices().rev());
            if element.name() == self.name {
                return Some(element);
            }
        }
        None
    }
}

#[derive(Debug, Default)]
struct TreeBuilder {
    elements: Vec<ElementData>,
    root: Option<usize>,
    open: Vec<usize>,
}

impl TreeBuilder {
    fn match_event(&mut self, event: Event) -> Result<Option<()>, XmlParseError> {
        match event {
            Event::Eof => return Ok(None),
            Event::Start(e) => {
                self.open_element(&e)?;
            }
            Event::End(e) => {
                self.close_element(String::from_utf8_lossy(e.local_name().as_ref()).as_ref())?
            }
            Event::Empty(e) => {
                let name = self.open_element(&e)?;
                self.close_element(&name)?;
            }
            Event::Text(e) => self.push_text(&e)?,
            Event::CData(e) => {
                self.push_string(String::from_utf8_lossy(&e).into_owned());
            }
            _ => (),
        };
        Ok(Some(()))
    }

    fn open_element(&mut self, e: &BytesStart) -> Result<String, XmlParseError> {
        let name = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
        let attributes = e
            .attributes()
            .map(|attr| -> Result<(String, String), XmlParseError> {
                let attr = attr.map_err(quick_xml::Error::from)?;
                Ok((
                    String::from_utf8_lossy(attr.key.local_name().as_ref()).into_owned(),
                    attr.unescape_value()?.into_owned(),
                ))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let index = self.elements.len();
        let parent = self.open.last().copied();
        match parent {
            Some(parent) => self.elements[parent].nodes.push(Node::Element(index)),
            None if self.root.is_some() => return Err(XmlParseError::MultipleRoots),
            None => self.root = Some(index),
        }
        self.elements.push(ElementData {
            name: name.clone(),
            attributes,
            parent,
            nodes: Vec::new(),
        });
        self.open.push(index);
        Ok(name)
    }

    fn close_element(&mut self, name: &str) -> Result<(), XmlParseError> {
        match self.open.pop() {
            Some(_) => Ok(()),
            None => Err(XmlParseError::EndTagWithoutStartTag(String::from(name))),
        }
    }

    fn push_text(&mut self, e: &BytesText) -> Result<(), XmlParseError> {
        let text = e.unescape()?;
        self.push_string(text.into_owned());
        Ok(())
    }

    fn push_string(&mut self, text: String) {
        // Text outside the root element carries no data.
        if let Some(open) = self.open.last() {
            self.elements[*open].nodes.push(Node::Text(text));
        }
    }
}
