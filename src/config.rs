//! Process-wide loader configuration.
//!
//! The firmware version and the exception list are shared by every loader in the
//! process. They may be replaced at any time, but a loader only sees the values
//! current when it was constructed: [`GraftletLoader::new`]( crate::GraftletLoader::new )
//! takes a snapshot, so a change never affects a resolution pass already under way.
//! Loaders built with [`GraftletLoader::with_config`]( crate::GraftletLoader::with_config )
//! ignore the global values entirely.

use std::sync::{ PoisonError, RwLock };
use once_cell::sync::Lazy ;
use serde::{ Deserialize, Serialize };

use crate::version::Version ;
use crate::firmware::ExceptionList ;



/// Firmware version assumed until the host sets one.
pub const DEFAULT_FIRMWARE_VERSION: Version = Version::new( 1, 0 );

/// Settings a resolution pass depends on.
///
/// Serialises as
/// `{ "firmware_version": "1.2", "exceptions": { "name": [{ "min": "0.1", "max": "0.9" }] } }`;
/// both fields may be omitted.
#[derive( Clone, Debug, PartialEq, Eq, Serialize, Deserialize )]
#[serde( default )]
pub struct LoaderConfig {
	pub firmware_version: Version,
	pub exceptions: ExceptionList,
}

impl Default for LoaderConfig {
	fn default() -> Self {
		Self { firmware_version: DEFAULT_FIRMWARE_VERSION, exceptions: ExceptionList::new() }
	}
}

impl LoaderConfig {
	pub fn new( firmware_version: Version, exceptions: ExceptionList ) -> Self {
		Self { firmware_version, exceptions }
	}
}

static GLOBAL: Lazy<RwLock<LoaderConfig>> = Lazy::new(|| RwLock::new( LoaderConfig::default() ));

/// A copy of the current global configuration.
pub fn current() -> LoaderConfig {
	GLOBAL.read().unwrap_or_else( PoisonError::into_inner ).clone()
}

/// Replaces the global configuration, returning the previous one.
pub fn replace( config: LoaderConfig ) -> LoaderConfig {
	let mut global = GLOBAL.write().unwrap_or_else( PoisonError::into_inner );
	std::mem::replace( &mut *global, config )
}

pub fn firmware_version() -> Version {
	GLOBAL.read().unwrap_or_else( PoisonError::into_inner ).firmware_version
}

pub fn set_firmware_version( version: Version ) {
	GLOBAL.write().unwrap_or_else( PoisonError::into_inner ).firmware_version = version ;
}

pub fn exception_list() -> ExceptionList {
	GLOBAL.read().unwrap_or_else( PoisonError::into_inner ).exceptions.clone()
}

pub fn set_exception_list( exceptions: ExceptionList ) {
	GLOBAL.write().unwrap_or_else( PoisonError::into_inner ).exceptions = exceptions ;
}
