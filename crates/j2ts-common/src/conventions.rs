//! Naming conventions shared with the target runtime.
//!
//! These names are fixed by the runtime libraries the emitted code links
//! against and by the binding definitions the front end loads, so they are
//! constants rather than options.

/// Package holding the language annotations. Configuration keys without a
/// package (`@Erased`) are qualified with it.
pub const LANG_PACKAGE: &str = "jsweet.lang";

/// Prefix of the binding definition packages. Any `def.<name>` package is a
/// root package.
pub const LIBS_PACKAGE: &str = "def";

/// Package of the numbered functional types (`Function4`, `TriConsumer`, ...).
pub const FUNCTION_CLASSES_PACKAGE: &str = "jsweet.util.function";

/// Package of the platform functional types (`BiFunction`, `Supplier`, ...).
pub const PLATFORM_FUNCTION_PACKAGE: &str = "java.util.function";

pub const RUNNABLE: &str = "java.lang.Runnable";

// =============================================================================
// Annotations
// =============================================================================

/// Marks a package as a root; names are resolved relative to it.
pub const ANNOTATION_ROOT: &str = "jsweet.lang.Root";

/// Renames the annotated element in the emitted code.
pub const ANNOTATION_NAME: &str = "jsweet.lang.Name";

/// Emits the annotated class as a structural interface.
pub const ANNOTATION_INTERFACE: &str = "jsweet.lang.Interface";

/// Emits the annotated class as an object type.
pub const ANNOTATION_OBJECT_TYPE: &str = "jsweet.lang.ObjectType";

pub const ANNOTATION_FUNCTIONAL_INTERFACE: &str = "java.lang.FunctionalInterface";

// =============================================================================
// Reserved member names
// =============================================================================

/// A method with this name makes instances callable as functions.
pub const ANONYMOUS_FUNCTION_NAME: &str = "apply";

pub const INDEXED_GET_FUNCTION_NAME: &str = "$get";

pub const INDEXED_SET_FUNCTION_NAME: &str = "$set";

/// Prefix of the synthetic type parameters bound to wildcards (`__T1`, ...).
pub const WILDCARD_NAME_PREFIX: &str = "__T";
