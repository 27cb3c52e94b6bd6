//! 实体基础 trait

/// 实体 trait
pub trait Entity {
    type Id: PartialEq;

    fn id(&self) -> &Self::Id;
}
