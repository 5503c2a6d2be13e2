#![no_std]

// Light-timing logic for the three-lamp traffic signal.
//
// This crate stays portable across MCU firmware and host tooling by avoiding the
// Rust standard library. Front-ends supply the tick source, the trigger inputs,
// and the lamp driver; everything with real decisions in it lives here.

pub mod console;
pub mod controller;
pub mod rate;
pub mod sequences;
pub mod status;
pub mod telemetry;
