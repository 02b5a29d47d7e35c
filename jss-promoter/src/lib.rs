//! Promote configuration objects from one JSS instance to another.
//!
//! Objects are read from a source server, rewritten by manifest rules so they
//! no longer carry source-specific data (ids, sites, password hashes), and
//! created on a target server in an order that keeps references resolvable.
//!
//! # Architecture
//!
//! ## Rules
//!
//! - [`manifest`] — Global and per-resource-type rule sets, loaded from TOML
//! - [`transform`] — Applies a rule set to one XML document
//!
//! ## Servers
//!
//! - [`resource`] — Resource types, their endpoints and dependency order
//! - [`identifier`] — Object ids and names
//! - [`api`] — The operations the promoter needs from a server
//! - [`client`] — Blocking HTTP implementation of [`api::ResourceApi`]
//!
//! ## Orchestration
//!
//! - [`promote`] — Clean a target server, migrate every object to it
//! - [`config`] — Server connection settings
//!
//! # Examples
//!
//! ```ignore
//! use jss_promoter::manifest::default_rules;
//! use jss_promoter::resource::ResourceType;
//! use jss_promoter::transform::Transformer;
//!
//! let transformer = Transformer::new(default_rules()?);
//! let document = transformer.transform(&raw_xml, ResourceType::Computers)?;
//! ```
//!
//! # Built on xml-tree-core
//!
//! XML parsing, writing and path addressing come from `xml-tree-core`; all
//! JSS-specific knowledge lives in this crate.

pub mod api;
pub mod client;
pub mod config;
pub mod identifier;
pub mod manifest;
pub mod promote;
pub mod resource;
pub mod transform;
