//! Why a candidate graftlet was not activated, and the lifecycle it moves through.

use thiserror::Error ;

use crate::version::{ Version, VersionRange };
use crate::dependency_spec::DependencySpecError ;
use crate::graftlet::GraftletError ;



/// Reason a graftlet was left out of the active set.
///
/// None of these stop resolution: the loader records the reason, logs it and
/// carries on with the remaining candidates.
#[derive( Clone, Debug, PartialEq, Eq, Error )]
pub enum Exclusion {

	/// The host firmware lies outside the graftlet's supported range and no
	/// exception-list range for it matches either.
	#[error( "Firmware {firmware} is outside the supported range {supported}" )]
	FirmwareIncompatible { firmware: Version, supported: VersionRange },

	/// The dependency declaration could not be parsed.
	#[error( "Malformed dependency declaration: {0}" )]
	MalformedDependencySpec( DependencySpecError ),

	/// A required module is absent, excluded, or older than required.
	#[error( "Dependency {dependency} >= {required} unsatisfied{}", found_suffix( .found ))]
	DependencyUnsatisfied { dependency: String, required: Version, found: Option<Version> },

	/// The graftlet takes part in a dependency cycle.
	#[error( "Dependency cycle: {}", .cycle.join( " -> " ))]
	DependencyCycle { cycle: Vec<String> },

	/// The graftlet's activation routine reported an error.
	#[error( "Activation failed: {0}" )]
	ActivationFailed( GraftletError ),

}

fn found_suffix( found: &Option<Version> ) -> String {
	match found {
		Some( version ) => format!( " (found {})", version ),
		None => " (not available)".to_string(),
	}
}

impl Exclusion {
	/// The lifecycle state a graftlet excluded for this reason ends up in.
	pub fn state( &self ) -> GraftletState {
		match self {
			Self::FirmwareIncompatible { .. } => GraftletState::FirmwareRejected,
			Self::MalformedDependencySpec( _ )
			| Self::DependencyUnsatisfied { .. }
			| Self::ActivationFailed( _ ) => GraftletState::DependencyFailed,
			Self::DependencyCycle { .. } => GraftletState::InCycle,
		}
	}
}

/// Lifecycle of a candidate graftlet within one loader.
#[derive( Copy, Clone, Debug, PartialEq, Eq, Hash )]
pub enum GraftletState {
	/// Found by a scan or registered, not resolved yet.
	Discovered,
	/// Dropped by the firmware compatibility check.
	FirmwareRejected,
	/// Dropped for a malformed, missing or outdated dependency, or a failed activation.
	DependencyFailed,
	/// Dropped for taking part in a dependency cycle.
	InCycle,
	/// Resolved and currently running its activation routine.
	Activating,
	/// Activated; its endpoints are available.
	Active,
}

impl std::fmt::Display for GraftletState {
	fn fmt( &self, f: &mut std::fmt::Formatter ) -> std::fmt::Result { write!( f, "{:?}", self )}
}
