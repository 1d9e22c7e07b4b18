//! Lap-position navigation field.
//!
//! Each drivable pixel of a track carries a [`LapPosition`]: the track section it
//! belongs to, how far along that section it is, and how far it sits from the
//! section's centerline. [`NavigationField`] is the read-only lookup the overlay
//! consumes; [`LapPositionTable`] is the dense in-memory implementation, loaded
//! from a precomputed RON file with [`read_table_file`].

mod error;
mod io;
mod table;

pub use error::FieldLoadError;
pub use io::{SampleRecord, TableFile, parse_table_file, read_table_file, save_table};
pub use table::{LapPosition, LapPositionTable, NavigationField};
