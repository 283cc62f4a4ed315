use crate::core::attributes::{AttributeRef, NominalAttribute};

/// Schema shared by every instance a stream yields: relation name, ordered
/// attributes and the position of the class attribute.
pub struct InstanceHeader {
    pub relation_name: String,
    pub attributes: Vec<AttributeRef>,
    pub class_index: usize,
}

impl InstanceHeader {
    pub fn new(
        relation_name: String,
        attributes: Vec<AttributeRef>,
        class_index: usize,
    ) -> InstanceHeader {
        InstanceHeader {
            relation_name,
            attributes,
            class_index,
        }
    }

    pub fn number_of_attributes(&self) -> usize {
        self.attributes.len()
    }

    pub fn relation_name(&self) -> &str {
        &self.relation_name
    }

    pub fn attribute_at_index(&self, index: usize) -> Option<&AttributeRef> {
        self.attributes.get(index)
    }

    pub fn index_of_attribute(&self, name: &str) -> Option<usize> {
        self.attributes.iter().position(|attr| attr.name() == name)
    }

    pub fn class_index(&self) -> usize {
        self.class_index
    }

    pub fn class_attribute(&self) -> Option<&AttributeRef> {
        self.attributes.get(self.class_index)
    }

    /// Number of class labels, or 0 when the target is numeric.
    pub fn number_of_classes(&self) -> usize {
        self.class_attribute()
            .and_then(|attr| attr.as_any().downcast_ref::<NominalAttribute>())
            .map_or(0, |nominal| nominal.values.len())
    }

    /// Number of attributes the model sees, i.e. all but the class.
    pub fn number_of_features(&self) -> usize {
        self.attributes.len().saturating_sub(1)
    }

    /// Maps a model feature id onto the attribute position, skipping the class.
    pub fn feature_id_to_attribute_index(&self, feature_id: usize) -> usize {
        if feature_id < self.class_index {
            feature_id
        } else {
            feature_id + 1
        }
    }
}
