use crate::core::instances::Instance;
use crate::error::Result;
use crate::learners::hoeffding_tree::instance_conditional_test::{
    NominalAttributeBinaryTest, NominalAttributeMultiwayTest, NumericAttributeBinaryTest,
};
use std::fmt::{Display, Formatter};

/// Routing decision stored in a split node.
#[derive(Debug, Clone, PartialEq)]
pub enum InstanceConditionalTest {
    NumericBinary(NumericAttributeBinaryTest),
    NominalBinary(NominalAttributeBinaryTest),
    NominalMultiway(NominalAttributeMultiwayTest),
}

impl InstanceConditionalTest {
    /// Branch the instance falls into. `Ok(None)` means the test cannot
    /// decide (missing feature, unseen category) and the caller routes to the
    /// default child.
    pub fn branch_for_instance(&self, instance: &dyn Instance) -> Result<Option<usize>> {
        match self {
            InstanceConditionalTest::NumericBinary(t) => t.branch_for_instance(instance),
            InstanceConditionalTest::NominalBinary(t) => t.branch_for_instance(instance),
            InstanceConditionalTest::NominalMultiway(t) => t.branch_for_instance(instance),
        }
    }

    pub fn result_known_for_instance(&self, instance: &dyn Instance) -> bool {
        matches!(self.branch_for_instance(instance), Ok(Some(_)))
    }

    pub fn max_branches(&self) -> usize {
        match self {
            InstanceConditionalTest::NumericBinary(_) | InstanceConditionalTest::NominalBinary(_) => 2,
            InstanceConditionalTest::NominalMultiway(t) => t.max_branches(),
        }
    }

    pub fn feature_id(&self) -> usize {
        match self {
            InstanceConditionalTest::NumericBinary(t) => t.feature_id(),
            InstanceConditionalTest::NominalBinary(t) => t.feature_id(),
            InstanceConditionalTest::NominalMultiway(t) => t.feature_id(),
        }
    }

    pub fn get_atts_test_depends_on(&self) -> Vec<usize> {
        vec![self.feature_id()]
    }

    pub fn calc_byte_size(&self) -> usize {
        match self {
            InstanceConditionalTest::NominalMultiway(t) => t.calc_byte_size(),
            _ => size_of::<Self>(),
        }
    }
}

impl Display for InstanceConditionalTest {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            InstanceConditionalTest::NumericBinary(t) => {
                write!(f, "x{} <= {}", t.feature_id(), t.threshold())
            }
            InstanceConditionalTest::NominalBinary(t) => {
                write!(f, "x{} == {}", t.feature_id(), t.value())
            }
            InstanceConditionalTest::NominalMultiway(t) => {
                write!(f, "x{} in {} categories", t.feature_id(), t.max_branches())
            }
        }
    }
}
