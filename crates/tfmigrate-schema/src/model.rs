//! Schema model types.
//!
//! Attributes and blocks are stored in sorted maps keyed by name, so every
//! iteration over a model (and therefore every rendering of it) is
//! lexicographic regardless of the order entries were declared in.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Error raised when a model would violate one of its invariants.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ModelError {
    #[error("duplicate schema entry {0:?}")]
    DuplicateEntry(String),

    #[error("attribute {name:?}: element type must be a scalar, got {kind}")]
    CollectionElement { name: String, kind: ValueKind },

    #[error("attribute {name:?}: {kind} attribute has no element type")]
    MissingElement { name: String, kind: ValueKind },

    #[error("block {block:?} cannot contain nested block {nested:?}")]
    NestedBlock { block: String, nested: String },
}

/// The seven type tokens of the source dialect (`schema.TypeString`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    String,
    Bool,
    Int,
    Float,
    List,
    Set,
    Map,
}

impl ValueKind {
    /// Map a source type token name (`TypeString`, `TypeList`, ...) to a kind.
    pub fn from_sdk_name(name: &str) -> Option<Self> {
        match name {
            "TypeString" => Some(Self::String),
            "TypeBool" => Some(Self::Bool),
            "TypeInt" => Some(Self::Int),
            "TypeFloat" => Some(Self::Float),
            "TypeList" => Some(Self::List),
            "TypeSet" => Some(Self::Set),
            "TypeMap" => Some(Self::Map),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Bool => "bool",
            Self::Int => "int",
            Self::Float => "float",
            Self::List => "list",
            Self::Set => "set",
            Self::Map => "map",
        }
    }

    /// Whether attributes of this kind carry an element type.
    pub fn is_collection(&self) -> bool {
        matches!(self, Self::List | Self::Set | Self::Map)
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Element type of a collection attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ElemType {
    String,
    Bool,
    Int,
    Float,
}

impl ElemType {
    pub fn from_kind(kind: ValueKind) -> Option<Self> {
        match kind {
            ValueKind::String => Some(Self::String),
            ValueKind::Bool => Some(Self::Bool),
            ValueKind::Int => Some(Self::Int),
            ValueKind::Float => Some(Self::Float),
            ValueKind::List | ValueKind::Set | ValueKind::Map => None,
        }
    }

    pub fn kind(&self) -> ValueKind {
        match self {
            Self::String => ValueKind::String,
            Self::Bool => ValueKind::Bool,
            Self::Int => ValueKind::Int,
            Self::Float => ValueKind::Float,
        }
    }
}

/// Resolved attribute type. Collections always know their element type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "type", content = "element_type", rename_all = "lowercase")]
pub enum AttrType {
    String,
    Bool,
    Int,
    Float,
    List(ElemType),
    Set(ElemType),
    Map(ElemType),
}

impl AttrType {
    /// Combine a type token with an optional element type.
    ///
    /// Fails when a collection has no element type, or when the element
    /// type is itself a collection. A scalar ignores `elem`.
    pub fn from_parts(
        name: &str,
        kind: ValueKind,
        elem: Option<ValueKind>,
    ) -> Result<Self, ModelError> {
        let wrap: fn(ElemType) -> Self = match kind {
            ValueKind::String => return Ok(Self::String),
            ValueKind::Bool => return Ok(Self::Bool),
            ValueKind::Int => return Ok(Self::Int),
            ValueKind::Float => return Ok(Self::Float),
            ValueKind::List => Self::List,
            ValueKind::Set => Self::Set,
            ValueKind::Map => Self::Map,
        };

        let elem = elem.ok_or_else(|| ModelError::MissingElement {
            name: name.to_string(),
            kind,
        })?;
        let elem = ElemType::from_kind(elem).ok_or_else(|| ModelError::CollectionElement {
            name: name.to_string(),
            kind: elem,
        })?;
        Ok(wrap(elem))
    }

    pub fn kind(&self) -> ValueKind {
        match self {
            Self::String => ValueKind::String,
            Self::Bool => ValueKind::Bool,
            Self::Int => ValueKind::Int,
            Self::Float => ValueKind::Float,
            Self::List(_) => ValueKind::List,
            Self::Set(_) => ValueKind::Set,
            Self::Map(_) => ValueKind::Map,
        }
    }

    pub fn element(&self) -> Option<ElemType> {
        match self {
            Self::List(elem) | Self::Set(elem) | Self::Map(elem) => Some(*elem),
            _ => None,
        }
    }

    pub fn is_collection(&self) -> bool {
        self.element().is_some()
    }
}

/// A single schema field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Attribute {
    pub name: String,
    #[serde(flatten)]
    pub ty: AttrType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_items: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_items: Option<i64>,
    pub optional: bool,
    pub required: bool,
    pub computed: bool,
    pub sensitive: bool,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
}

impl Attribute {
    /// A new attribute with every flag unset and no description.
    pub fn new(name: impl Into<String>, ty: AttrType) -> Self {
        Self {
            name: name.into(),
            ty,
            min_items: None,
            max_items: None,
            optional: false,
            required: false,
            computed: false,
            sensitive: false,
            description: String::new(),
        }
    }
}

/// Cardinality of a nested block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockKind {
    List,
    Set,
}

impl BlockKind {
    /// Only list and set attributes can be promoted to blocks.
    pub fn from_kind(kind: ValueKind) -> Option<Self> {
        match kind {
            ValueKind::List => Some(Self::List),
            ValueKind::Set => Some(Self::Set),
            _ => None,
        }
    }
}

/// A repeatable group of attributes. Blocks nest exactly one level deep.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Block {
    pub name: String,
    pub kind: BlockKind,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_items: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_items: Option<i64>,
    attributes: BTreeMap<String, Attribute>,
}

impl Block {
    pub fn new(name: impl Into<String>, kind: BlockKind) -> Self {
        Self {
            name: name.into(),
            kind,
            description: String::new(),
            min_items: None,
            max_items: None,
            attributes: BTreeMap::new(),
        }
    }

    /// Build a block from resolved entries, rejecting any nested block.
    pub fn from_entries(
        name: impl Into<String>,
        kind: BlockKind,
        entries: Vec<SchemaEntry>,
    ) -> Result<Self, ModelError> {
        let mut block = Self::new(name, kind);
        for entry in entries {
            match entry {
                SchemaEntry::Attribute(attr) => block.insert_attribute(attr)?,
                SchemaEntry::Block(nested) => {
                    return Err(ModelError::NestedBlock {
                        block: block.name,
                        nested: nested.name,
                    });
                }
            }
        }
        Ok(block)
    }

    pub fn insert_attribute(&mut self, attr: Attribute) -> Result<(), ModelError> {
        if self.attributes.contains_key(&attr.name) {
            return Err(ModelError::DuplicateEntry(attr.name));
        }
        self.attributes.insert(attr.name.clone(), attr);
        Ok(())
    }

    /// Attributes sorted by name.
    pub fn attributes(&self) -> impl ExactSizeIterator<Item = &Attribute> {
        self.attributes.values()
    }

    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.get(name)
    }

    pub fn uses_collections(&self) -> bool {
        self.attributes.values().any(|a| a.ty.is_collection())
    }
}

/// One resolved entry of a schema map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "entry", rename_all = "lowercase")]
pub enum SchemaEntry {
    Attribute(Attribute),
    Block(Block),
}

impl SchemaEntry {
    pub fn name(&self) -> &str {
        match self {
            Self::Attribute(attr) => &attr.name,
            Self::Block(block) => &block.name,
        }
    }
}

/// Root of the model: attributes and blocks sharing one namespace.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SchemaModel {
    attributes: BTreeMap<String, Attribute>,
    blocks: BTreeMap<String, Block>,
}

impl SchemaModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a model from resolved entries.
    pub fn from_entries(entries: Vec<SchemaEntry>) -> Result<Self, ModelError> {
        let mut model = Self::new();
        for entry in entries {
            model.insert(entry)?;
        }
        Ok(model)
    }

    pub fn insert(&mut self, entry: SchemaEntry) -> Result<(), ModelError> {
        match entry {
            SchemaEntry::Attribute(attr) => self.insert_attribute(attr),
            SchemaEntry::Block(block) => self.insert_block(block),
        }
    }

    /// Insert an attribute; its name must not be used by any attribute or block.
    pub fn insert_attribute(&mut self, attr: Attribute) -> Result<(), ModelError> {
        self.check_free(&attr.name)?;
        self.attributes.insert(attr.name.clone(), attr);
        Ok(())
    }

    /// Insert a block; its name must not be used by any attribute or block.
    pub fn insert_block(&mut self, block: Block) -> Result<(), ModelError> {
        self.check_free(&block.name)?;
        self.blocks.insert(block.name.clone(), block);
        Ok(())
    }

    fn check_free(&self, name: &str) -> Result<(), ModelError> {
        if self.attributes.contains_key(name) || self.blocks.contains_key(name) {
            return Err(ModelError::DuplicateEntry(name.to_string()));
        }
        Ok(())
    }

    /// Attributes sorted by name.
    pub fn attributes(&self) -> impl ExactSizeIterator<Item = &Attribute> {
        self.attributes.values()
    }

    /// Blocks sorted by name.
    pub fn blocks(&self) -> impl ExactSizeIterator<Item = &Block> {
        self.blocks.values()
    }

    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.get(name)
    }

    pub fn block(&self, name: &str) -> Option<&Block> {
        self.blocks.get(name)
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty() && self.blocks.is_empty()
    }

    /// True iff any attribute, top-level or inside a block, is a collection.
    pub fn uses_collections(&self) -> bool {
        self.attributes.values().any(|a| a.ty.is_collection())
            || self.blocks.values().any(Block::uses_collections)
    }
}
