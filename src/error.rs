use thiserror::Error;

macro_rules! malformed_error {
    // Single string version
    ($msg:expr) => {
        crate::Error::Malformed {
            message: $msg.to_string(),
            file: file!(),
            line: line!(),
        }
    };

    // Format string with arguments version
    ($fmt:expr, $($arg:tt)*) => {
        crate::Error::Malformed {
            message: format!($fmt, $($arg)*),
            file: file!(),
            line: line!(),
        }
    };
}

/// The generic Error type, which provides coverage for all errors this library can potentially
/// return.
///
/// Extraction and comparison are pure functions over in-memory trees, so the set of failure
/// modes is small: structurally inconsistent input, references that must resolve but don't,
/// and problems reading or writing the XML documents that persist trees between runs.
///
/// # Error Categories
///
/// ## Input Errors
/// - [`Error::Malformed`] - Inconsistent metadata, signature or document structure
/// - [`Error::TypeNotFound`] - A reference that is required to resolve could not be resolved
/// - [`Error::RecursionLimit`] - A base-type or nesting chain exceeded the depth limit
///
/// ## I/O and External Errors
/// - [`Error::FileError`] - Filesystem I/O errors
/// - [`Error::Load`] - The metadata reader rejected an assembly file
/// - [`Error::Xml`] - Reading or writing an XML document failed
/// - [`Error::Pattern`] - A report filter is not a valid regular expression
///
/// # Examples
///
/// ```rust
/// use apiscope::{Error, tree::xml::from_xml};
///
/// match from_xml("<assemblies/>") {
///     Ok(tree) => println!("loaded {}", tree.name),
///     Err(Error::Malformed { message, file, line }) => {
///         eprintln!("Malformed document: {} ({}:{})", message, file, line);
///     }
///     Err(e) => eprintln!("Other error: {}", e),
/// }
/// ```
#[derive(Error, Debug)]
pub enum Error {
    /// The input is structurally inconsistent and could not be processed.
    ///
    /// Raised for type signatures that cannot describe a real type (an array of rank 0,
    /// a generic instantiation over a non-named type) and for documents that lack an
    /// element or attribute the format requires. The error includes the source location
    /// where the malformation was detected for debugging purposes.
    ///
    /// # Fields
    ///
    /// * `message` - Detailed description of what was malformed
    /// * `file` - Source file where the error was detected
    /// * `line` - Source line where the error was detected
    #[error("Malformed - {file}:{line}: {message}")]
    Malformed {
        /// The message to be printed for the Malformed error
        message: String,
        /// The source file in which this error occured
        file: &'static str,
        /// The source line in which this error occured
        line: u32,
    },

    /// A type reference could not be resolved where resolution is mandatory.
    ///
    /// Most resolution failures degrade gracefully. Following a type forwarder is the
    /// exception: unless resolution errors are ignored, a forwarder whose destination
    /// cannot be found aborts the extraction. The associated value is the full name
    /// of the type that was looked up.
    #[error("Failed to resolve type - {0}")]
    TypeNotFound(String),

    /// Recursion limit reached.
    ///
    /// Base-type chains and nested-type trees are walked recursively. A cyclic or
    /// absurdly deep hierarchy stops at a fixed depth instead of overflowing the stack.
    ///
    /// The associated value shows the recursion limit that was reached.
    #[error("Reach the maximum recursion level allowed - {0}")]
    RecursionLimit(usize),

    /// File I/O error.
    ///
    /// Wraps standard I/O errors that can occur while reading or writing documents.
    #[error("{0}")]
    FileError(#[from] std::io::Error),

    /// Loading an assembly through the metadata reader failed.
    ///
    /// Raised when a file is not a valid .NET PE image or its metadata tables cannot be
    /// parsed.
    #[error("Failed to load assembly - {0}")]
    Load(#[from] dotscope::Error),

    /// XML reader or writer error.
    ///
    /// Wraps errors reported by `quick-xml`, including invalid attribute syntax and
    /// unbalanced tags.
    #[error("XML error - {0}")]
    Xml(String),

    /// A report filter pattern failed to compile.
    #[error("Invalid pattern - {0}")]
    Pattern(#[from] regex::Error),
}

impl Error {
    /// Wrap any displayable XML-layer error into [`Error::Xml`].
    pub(crate) fn xml<E: std::fmt::Display>(error: E) -> Self {
        Error::Xml(error.to_string())
    }
}
