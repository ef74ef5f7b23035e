//! Filesystem and output conveniences shared by the analysis binaries.

// `write_npz!` resolves the writer types through this re-export so that
// dependent crates don't need `ndarray-npy` themselves.
pub use ndarray_npy as npy;

/// Create a directory, with all parent directories, if it doesn't already
/// exist.
///
/// *Panics* on any filesystem error.
#[macro_export]
macro_rules! mkdir {
    ( $path:expr ) => {
        match std::fs::create_dir_all(&$path) {
            Ok(_) => { },
            Err(err) => panic!("couldn't create directory {:?}: {}", $path, err),
        }
    }
}

/// Write a set of named `ndarray` arrays to a single `.npz` archive,
/// overwriting any previous file at the same path.
///
/// Expected call form:
/// ```ignore
/// write_npz!(
///     path, // impl AsRef<Path>
///     arrays: {
///         "array_name_1" => &array_1, // ArrayBase
///         // ...
///     }
/// );
/// ```
///
/// *Panics* on any I/O or encoding error.
#[macro_export]
macro_rules! write_npz {
    (
        $path:expr,
        arrays: { $( $name:expr => $arr:expr ),+ $(,)? }
    ) => {
        {
            let mut npz =
                $crate::utils::npy::NpzWriter::new(
                    match std::fs::File::create(&$path) {
                        Ok(f) => f,
                        Err(err) =>
                            panic!("couldn't create file {:?}: {}", $path, err),
                    }
                );
            $(
                if let Err(err) = npz.add_array($name, $arr) {
                    panic!("couldn't write array {:?}: {}", $name, err);
                }
            )+
            if let Err(err) = npz.finish() {
                panic!("couldn't finish archive {:?}: {}", $path, err);
            }
        }
    }
}

/// Call `print!` and immediately flush stdout.
#[macro_export]
macro_rules! print_flush {
    ( $fmt:literal $(, $val:expr )* $(,)? ) => {
        print!($fmt $(, $val )*);
        match std::io::Write::flush(&mut std::io::stdout()) {
            Ok(_) => { },
            Err(err) => panic!("couldn't flush stdout: {}", err),
        }
    }
}
