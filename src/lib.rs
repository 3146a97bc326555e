//! Covfix - PHPUnit coverage attribute fixer
//!
//! Covfix is a CLI tool and library that keeps `#[CoversClass]` and
//! `#[CoversMethod]` attributes on PHP test classes pointing at the class
//! each test actually exercises. The tested class is derived from the test
//! class's namespace and name, Laravel-style (`Tests\Unit\Services\FooTest`
//! covers `App\Services\Foo`).
//!
//! ## Module Structure
//!
//! - `cli`: Command-line interface layer (user-facing commands and actions)
//! - `config`: Configuration file loading and parsing
//! - `core`: Names, declarations, the resolver, PHP scanning and rewriting
//! - `issues`: Issue type definitions and reporting
//! - `mcp`: Model Context Protocol server implementation
//! - `rules`: Class-level rules run over parsed files

pub mod cli;
pub mod config;
pub mod core;
pub mod issues;
pub mod mcp;
pub mod rules;
