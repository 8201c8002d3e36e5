#![deny(future_incompatible)]
#![deny(nonstandard_style)]
#![allow(
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap,
    clippy::cast_precision_loss,
    clippy::cast_sign_loss,
    clippy::module_name_repetitions,
    clippy::wildcard_imports
)]

use std::{
    borrow::Cow,
    collections::VecDeque,
    ffi::{CStr, CString},
    fs::File,
    io::{BufReader, BufWriter},
    mem::size_of,
    ops::Deref,
    path::{Path, PathBuf},
    slice,
    time::{Duration, Instant},
};

use anyhow::{anyhow, bail, ensure, Context, Result};
use ash::vk;
use bytemuck::{Pod, Zeroable};
use log::{debug, error, info, log, warn};
use nalgebra as na;
use serde::{Deserialize, Serialize};

#[cfg(test)]
use approx::assert_ulps_eq;

const TAU: f32 = std::f32::consts::TAU;

mod config;
mod editor;
mod error;
mod gpu;
mod math;
mod octree;
mod scene;
mod sphere;
mod vulkan;

use math::*;

fn main() -> Result<()> {
    env_logger::init();

    let config = config::Config::from_env()?;
    info!(
        "Starting with scene={} max_depth={} max_spheres_per_node={} use_octree={}",
        config.scene_path.display(),
        config.max_depth,
        config.max_spheres_per_node,
        config.use_octree,
    );

    if let Err(err) = editor::run(&config) {
        error!("{err}");
        return Err(err);
    }

    Ok(())
}
