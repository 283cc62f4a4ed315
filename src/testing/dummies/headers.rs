use crate::core::attributes::{AttributeRef, NominalAttribute, NumericAttribute};
use crate::core::instance_header::InstanceHeader;
use std::sync::Arc;

/// One numeric feature `x` followed by a binary class `{A, B}`.
pub fn header_binary() -> Arc<InstanceHeader> {
    let attributes: Vec<AttributeRef> = vec![
        Arc::new(NumericAttribute::new("x".into())),
        Arc::new(NominalAttribute::with_values(
            "class".into(),
            vec!["A".into(), "B".into()],
        )),
    ];
    Arc::new(InstanceHeader::new("bin".into(), attributes, 1))
}
