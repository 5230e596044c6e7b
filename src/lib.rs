#[macro_export]
macro_rules! debug_log {
	($($arg:tt)*) => {{
		#[cfg(debug_assertions)]
		{
			eprintln!($($arg)*);
		}
	}};
}

pub mod config;
pub mod error;
pub mod reader;
pub mod sanitize;
pub mod provider;
pub mod artifact;
pub mod compiler;

pub use compiler::{CompileReport, Compiler, ProviderStats, ResearchBundle};
pub use config::{load_config, Config};
pub use error::CompileError;
pub use provider::{Provider, ProviderDescriptor, ProviderResult};
