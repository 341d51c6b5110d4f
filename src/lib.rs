//! flex2tasty — Interactive Brokers Flex trade export to Tastyworks CSV
//! converter.
//!
//! Hexagonal architecture: conversion logic in [`domain`], port traits in
//! [`ports`], concrete implementations in [`adapters`].

pub mod adapters;
pub mod cli;
pub mod domain;
pub mod ports;
