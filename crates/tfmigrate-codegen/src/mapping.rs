//! Source-to-target type tables.

use tfmigrate_schema::{AttrType, BlockKind, ElemType};

/// Framework attribute type for a resolved attribute type.
pub fn attribute_type(ty: AttrType) -> &'static str {
    match ty {
        AttrType::String => "StringAttribute",
        AttrType::Bool => "BoolAttribute",
        AttrType::Int => "Int64Attribute",
        AttrType::Float => "Float64Attribute",
        AttrType::List(_) => "ListAttribute",
        AttrType::Set(_) => "SetAttribute",
        AttrType::Map(_) => "MapAttribute",
    }
}

/// `types` value for a collection element.
pub fn element_type(elem: ElemType) -> &'static str {
    match elem {
        ElemType::String => "types.StringType",
        ElemType::Bool => "types.BoolType",
        ElemType::Int => "types.Int64Type",
        ElemType::Float => "types.Float64Type",
    }
}

pub fn block_type(kind: BlockKind) -> &'static str {
    match kind {
        BlockKind::List => "ListNestedBlock",
        BlockKind::Set => "SetNestedBlock",
    }
}
