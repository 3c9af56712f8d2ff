pub use bevy::prelude::{
    default, App, Bundle, Commands, Component, Deref, DerefMut, Entity, Event, EventReader,
    EventWriter, Events, IVec2, IntoSystemConfigs, IntoSystemSetConfigs, Plugin, Query, Reflect,
    Res, ResMut, Resource, SystemSet, Update, With, Without, World,
};
pub use bevy::utils::{HashMap, HashSet};

pub use crate::common::*;
pub use crate::hex_grid::HexGrid;
pub use crate::op::{Op, OpResult, OpSubtype};
pub use crate::{get_assert, get_assert_mut};
