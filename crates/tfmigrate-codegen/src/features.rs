//! Features of a model that change the rendered import set.

use tfmigrate_schema::SchemaModel;

/// Computed once from the model before rendering; the framework template
/// is driven only by these flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Features {
    /// Some attribute (top-level or inside a block) is a list, set or map,
    /// so the `types` package is referenced for its element type.
    pub element_types: bool,
}

impl Features {
    pub fn of(model: &SchemaModel) -> Self {
        Self {
            element_types: model.uses_collections(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tfmigrate_schema::{AttrType, Attribute, Block, BlockKind, ElemType};

    #[test]
    fn test_scalar_model_has_no_element_types() {
        let mut model = SchemaModel::new();
        model
            .insert_attribute(Attribute::new("token", AttrType::String))
            .unwrap();
        assert_eq!(Features::of(&model), Features::default());
    }

    #[test]
    fn test_collection_in_block_sets_element_types() {
        let mut model = SchemaModel::new();
        let mut block = Block::new("auth", BlockKind::Set);
        block
            .insert_attribute(Attribute::new("ids", AttrType::Set(ElemType::Int)))
            .unwrap();
        model.insert_block(block).unwrap();
        assert!(Features::of(&model).element_types);
    }
}
