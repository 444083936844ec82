//! Filename-based language detection and keyword tables.
//!
//! A [`Syntax`] is built once per buffer from its filename and consumed by
//! the per-line tokenizer in [`scan`]. The languages are the ones a
//! systems project actually opens: C/C++, GLSL, CMake, Makefiles, GNU
//! assembly, and linker scripts. Everything else tokenizes with an empty
//! keyword table, which still gives comment/string/number colouring.

use std::collections::HashMap;
use std::path::Path;

use tracing::debug;

pub mod scan;

pub use scan::{ScanState, Token, parse_line, scan_state_after};

/// Detected language of a buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyntaxKind {
    None,
    CCpp,
    Glsl,
    Cmake,
    Assembly,
    Makefile,
    LdScript,
}

/// Highlight classes the renderer maps to colour pairs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HighlightClass {
    Default,
    Keyword,
    String,
    Number,
    Comment,
    Preprocessor,
    /// Registers (assembly) and well-known variables (make).
    Register,
}

const C_KEYWORDS: &[&str] = &[
    "auto", "break", "case", "char", "const", "continue", "default", "do", "double", "else",
    "enum", "extern", "float", "for", "goto", "if", "int", "long", "register", "return", "short",
    "signed", "sizeof", "static", "struct", "switch", "typedef", "union", "unsigned", "void",
    "volatile", "while", "class", "public", "private", "protected", "new", "delete", "this",
    "friend", "virtual", "inline", "try", "catch", "throw", "namespace", "using", "template",
    "typename", "true", "false", "bool", "asm", "explicit", "operator", "nullptr",
];

const GLSL_KEYWORDS: &[&str] = &[
    "in", "out", "inout", "uniform", "layout", "centroid", "smooth", "flat", "noperspective",
    "attribute", "varying", "buffer", "shared", "coherent", "restrict", "readonly", "writeonly",
    "atomic_uint", "binding", "location", "std140", "std430", "packed", "vec2", "vec3", "vec4",
    "ivec2", "ivec3", "ivec4", "bvec2", "bvec3", "bvec4", "uvec2", "uvec3", "uvec4", "dvec2",
    "dvec3", "dvec4", "mat2", "mat3", "mat4", "dmat2", "dmat3", "dmat4", "sampler1D", "sampler2D",
    "sampler3D", "samplerCube", "sampler2DRect", "sampler1DShadow", "sampler2DShadow",
    "samplerCubeShadow", "sampler1DArray", "sampler2DArray", "samplerBuffer", "sampler2DMS",
    "image1D", "image2D", "image3D", "imageCube", "imageBuffer", "image1DArray", "image2DArray",
    "discard", "precision", "highp", "mediump", "lowp", "local_size_x", "local_size_y",
    "local_size_z",
];

const CMAKE_KEYWORDS: &[&str] = &[
    "add_compile_definitions", "add_compile_options", "add_custom_command", "add_custom_target",
    "add_dependencies", "add_executable", "add_library", "add_link_options", "add_subdirectory",
    "add_test", "aux_source_directory", "break", "build_command", "cmake_minimum_required",
    "cmake_policy", "configure_file", "define_property", "else", "elseif", "enable_language",
    "enable_testing", "endforeach", "endfunction", "endif", "endmacro", "endwhile",
    "execute_process", "export", "file", "find_file", "find_library", "find_package", "find_path",
    "find_program", "foreach", "function", "get_cmake_property", "get_directory_property",
    "get_filename_component", "get_property", "get_source_file_property", "get_target_property",
    "get_test_property", "if", "include", "include_directories", "install", "link_directories",
    "link_libraries", "list", "macro", "mark_as_advanced", "math", "message", "option", "project",
    "remove_definitions", "return", "separate_arguments", "set", "set_directory_properties",
    "set_property", "set_source_files_properties", "set_target_properties",
    "set_tests_properties", "source_group", "string", "target_compile_definitions",
    "target_compile_features", "target_compile_options", "target_include_directories",
    "target_link_libraries", "target_link_options", "try_compile", "try_run", "unset",
    "variable_watch", "while",
];

const ASM_INSTRUCTIONS: &[&str] = &[
    "mov", "lea", "add", "sub", "mul", "imul", "div", "idiv", "inc", "dec", "and", "or", "xor",
    "not", "shl", "shr", "sal", "sar", "rol", "ror", "jmp", "je", "jne", "jz", "jnz", "jg", "jge",
    "jl", "jle", "ja", "jae", "jb", "jbe", "jc", "jnc", "call", "ret", "push", "pop", "cmp",
    "test", "syscall",
];

const ASM_REGISTERS: &[&str] = &[
    "rax", "eax", "ax", "al", "ah", "rbx", "ebx", "bx", "bl", "bh", "rcx", "ecx", "cx", "cl",
    "ch", "rdx", "edx", "dx", "dl", "dh", "rsi", "esi", "si", "sil", "rdi", "edi", "di", "dil",
    "rbp", "ebp", "bp", "bpl", "rsp", "esp", "sp", "spl", "r8", "r8d", "r8w", "r8b", "r9", "r9d",
    "r9w", "r9b", "r10", "r10d", "r10w", "r10b", "r11", "r11d", "r11w", "r11b", "r12", "r12d",
    "r12w", "r12b", "r13", "r13d", "r13w", "r13b", "r14", "r14d", "r14w", "r14b", "r15", "r15d",
    "r15w", "r15b",
];

const ASM_DIRECTIVES: &[&str] = &[
    ".align", ".ascii", ".asciz", ".byte", ".data", ".double", ".equ", ".extern", ".file",
    ".float", ".global", ".globl", ".int", ".long", ".quad", ".section", ".short", ".size",
    ".string", ".text", ".type", ".word", ".zero",
];

const MAKE_DIRECTIVES: &[&str] = &[
    "if", "ifeq", "ifneq", "else", "endif", "include", "define", "endef", "override", "export",
    "undefine",
];

const MAKE_VARIABLES: &[&str] = &[
    "CC", "CXX", "CPP", "LD", "AS", "AR", "CFLAGS", "CXXFLAGS", "LDFLAGS", "ASFLAGS", "ARFLAGS",
    "RM", "SHELL",
];

const LD_KEYWORDS: &[&str] = &[
    "ENTRY", "MEMORY", "SECTIONS", "INCLUDE", "OUTPUT_FORMAT", "OUTPUT_ARCH", "ASSERT", "ORIGIN",
    "LENGTH", "FILL",
];

const LD_FUNCTIONS: &[&str] = &["ALIGN", "DEFINED", "LOADADDR", "SIZEOF", "ADDR", "MAX", "MIN"];

/// Language rules for one buffer: keyword table plus the few per-language
/// scanning switches.
#[derive(Debug, Clone)]
pub struct Syntax {
    kind: SyntaxKind,
    keywords: HashMap<String, HighlightClass>,
    /// Fold words to lowercase before the keyword lookup (CMake).
    case_insensitive: bool,
    /// `%` introduces a register name (GNU assembly).
    register_sigil: bool,
}

impl Syntax {
    /// Detect the language from the filename and load its keyword table.
    pub fn for_path(path: &Path) -> Self {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_ascii_lowercase())
            .unwrap_or_default();
        let ext = name.rsplit_once('.').map(|(_, e)| e).unwrap_or("");

        let kind = if name == "makefile" || name == "gnumakefile" {
            SyntaxKind::Makefile
        } else if name == "cmakelists.txt" {
            SyntaxKind::Cmake
        } else {
            match ext {
                "c" | "h" | "cpp" | "hpp" | "cxx" => SyntaxKind::CCpp,
                "glsl" | "vert" | "frag" => SyntaxKind::Glsl,
                "s" | "asm" => SyntaxKind::Assembly,
                "ld" => SyntaxKind::LdScript,
                _ => SyntaxKind::None,
            }
        };
        debug!(target: "syntax", file = %name, ?kind, "detected");
        Self::for_kind(kind)
    }

    pub fn for_kind(kind: SyntaxKind) -> Self {
        let mut keywords = HashMap::new();
        let mut insert = |words: &[&str], class: HighlightClass| {
            for w in words {
                keywords.insert(w.to_string(), class);
            }
        };
        match kind {
            SyntaxKind::None => {}
            SyntaxKind::CCpp => insert(C_KEYWORDS, HighlightClass::Keyword),
            SyntaxKind::Glsl => {
                insert(C_KEYWORDS, HighlightClass::Keyword);
                insert(GLSL_KEYWORDS, HighlightClass::Keyword);
            }
            SyntaxKind::Cmake => insert(CMAKE_KEYWORDS, HighlightClass::Keyword),
            SyntaxKind::Assembly => {
                insert(ASM_INSTRUCTIONS, HighlightClass::Keyword);
                insert(ASM_DIRECTIVES, HighlightClass::Preprocessor);
                for r in ASM_REGISTERS {
                    keywords.insert(format!("%{r}"), HighlightClass::Register);
                }
            }
            SyntaxKind::Makefile => {
                insert(MAKE_DIRECTIVES, HighlightClass::Preprocessor);
                insert(MAKE_VARIABLES, HighlightClass::Register);
            }
            SyntaxKind::LdScript => {
                insert(LD_KEYWORDS, HighlightClass::Preprocessor);
                insert(LD_FUNCTIONS, HighlightClass::Keyword);
            }
        }
        Self {
            kind,
            keywords,
            case_insensitive: kind == SyntaxKind::Cmake,
            register_sigil: kind == SyntaxKind::Assembly,
        }
    }

    pub fn kind(&self) -> SyntaxKind {
        self.kind
    }

    /// Highlight class of one scanned word, `Default` when it is not a
    /// keyword of this language.
    pub fn class_of(&self, word: &str) -> HighlightClass {
        let looked_up = if self.case_insensitive {
            self.keywords.get(&word.to_ascii_lowercase())
        } else {
            self.keywords.get(word)
        };
        looked_up.copied().unwrap_or(HighlightClass::Default)
    }

    pub(crate) fn register_sigil(&self) -> bool {
        self.register_sigil
    }
}
