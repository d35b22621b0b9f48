//! Stress update and incremental kinematics for nonlinear solid mechanics
//!
//! This crate converts, at every quadrature point of a finite element, a strain increment
//! into an admissible stress state consistent with plasticity, creep, combined
//! creep-plasticity, or smeared cracking. It also computes the strain increments (and
//! incremental rotations for finite-strain analyses) from nodal displacement gradients.
//!
//! The main entry points are:
//!
//! * [tensor::SymTensor] and [tensor::SymElasticityTensor] -- symmetric tensor algebra
//! * [kinematics::KinematicsEngine] -- strain increments and incremental rotations
//! * [material::StressStrain] -- the constitutive update at a single quadrature point
//! * [material::MaterialStateStore] -- the persisted old/older/current states
//! * [fem::MaterialLoop] -- the (parallel) loop over elements of several subdomains

mod error;
pub use crate::error::*;

pub mod base;
pub mod fem;
pub mod kinematics;
pub mod material;
pub mod tensor;
