//! PHP-CS-Fixer presets and rules
//!
//! Maps preset names (`@PER-CS2.0`, `@PHP82Migration`, ...) to their
//! constituent rules. Presets include each other the way PHP-CS-Fixer's own
//! rule sets do, so `@PHP82Migration` expands through every older migration.

use rework_core::Tool;

use crate::registry::{RuleDef, SetDef, ToolTables};

pub static TABLES: ToolTables = ToolTables {
    tool: Tool::Fixer,
    sets: SETS,
    rules: RULES,
    defaults: DEFAULTS,
};

/// PSR-12 preset rules
pub const PSR12_RULES: &[&str] = &[
    // Whitespace
    "encoding",
    "full_opening_tag",
    "blank_line_after_opening_tag",
    "no_closing_tag",
    "indentation_type",
    "line_ending",
    "no_trailing_whitespace",
    "no_whitespace_in_blank_line",
    "single_blank_line_at_end_of_file",
    // Casing
    "constant_case",
    "lowercase_keywords",
    "lowercase_static_reference",
    // Namespaces and imports
    "blank_line_after_namespace",
    "no_leading_import_slash",
    "ordered_imports",
    "single_import_per_statement",
    "single_line_after_imports",
    // Class structure
    "braces_position",
    "class_definition",
    "no_blank_lines_after_class_opening",
    "single_class_element_per_statement",
    "single_trait_insert_per_statement",
    "visibility_required",
    // Control structures
    "control_structure_braces",
    "control_structure_continuation_position",
    "elseif",
    "no_alternative_syntax",
    "no_unneeded_braces",
    "single_space_around_construct",
    "switch_case_semicolon_to_colon",
    "switch_case_space",
    // Functions
    "compact_nullable_type_declaration",
    "declare_equal_normalize",
    "function_declaration",
    "method_argument_space",
    "no_spaces_after_function_name",
    "return_type_declaration",
    // Operators and spacing
    "binary_operator_spaces",
    "new_with_parentheses",
    "no_space_around_double_colon",
    "object_operator_without_whitespace",
    "ternary_operator_spaces",
    "unary_operator_spaces",
    // Comments
    "no_trailing_whitespace_in_comment",
    "single_line_comment_style",
];

/// PER-CS 2.0 preset rules: PSR-12 plus modern PHP formatting
pub const PERCS2_RULES: &[&str] = &[
    "@PSR12",
    "array_indentation",
    "cast_spaces",
    "concat_space",
    "single_line_empty_body",
    "trailing_comma_in_multiline",
    "native_function_casing",
    "magic_method_casing",
    "magic_constant_casing",
    "method_chaining_indentation",
];

const SETS: &[SetDef] = &[
    SetDef {
        id: "@PSR12",
        description: "PSR-12 coding style",
        members: PSR12_RULES,
    },
    SetDef {
        id: "@PSR12:risky",
        description: "Risky rules of PSR-12",
        members: &[
            "no_trailing_whitespace_in_string",
            "no_unreachable_default_argument_value",
        ],
    },
    SetDef {
        id: "@PER-CS2.0",
        description: "PER Coding Style 2.0",
        members: PERCS2_RULES,
    },
    SetDef {
        id: "@PER-CS2.0:risky",
        description: "Risky rules of PER Coding Style 2.0",
        members: &["@PSR12:risky"],
    },
    SetDef {
        id: "@PHP74Migration",
        description: "Syntax available up to PHP 7.4",
        members: &[
            "array_syntax",
            "heredoc_indentation",
            "list_syntax",
            "normalize_index_brace",
            "short_scalar_cast",
            "ternary_to_null_coalescing",
            "assign_null_coalescing_to_coalesce_equal",
            "visibility_required",
        ],
    },
    SetDef {
        id: "@PHP80Migration",
        description: "Syntax available up to PHP 8.0",
        members: &["@PHP74Migration", "clean_namespace", "no_unset_cast"],
    },
    SetDef {
        id: "@PHP81Migration",
        description: "Syntax available up to PHP 8.1",
        members: &["@PHP80Migration", "octal_notation"],
    },
    SetDef {
        id: "@PHP82Migration",
        description: "Syntax available up to PHP 8.2",
        members: &["@PHP81Migration", "simple_to_complex_string_variable"],
    },
    SetDef {
        id: "@PHP74Migration:risky",
        description: "Risky migrations up to PHP 7.4",
        members: &[
            "implode_call",
            "no_alias_functions",
            "use_arrow_functions",
            "combine_nested_dirname",
        ],
    },
    SetDef {
        id: "@PHP80Migration:risky",
        description: "Risky migrations up to PHP 8.0",
        members: &[
            "@PHP74Migration:risky",
            "modernize_strpos",
            "no_php4_constructor",
            "get_class_to_class_keyword",
        ],
    },
    SetDef {
        id: "@PHP82Migration:risky",
        description: "Risky migrations up to PHP 8.2",
        members: &["@PHP80Migration:risky", "phpdoc_readonly_class_comment_to_keyword"],
    },
];

const RULES: &[RuleDef] = &[
    // Alias
    RuleDef::risky("no_alias_functions", "Master functions shall be used instead of aliases"),
    RuleDef::risky(
        "modernize_strpos",
        "Replace strpos() calls with str_starts_with() or str_contains()",
    ),
    // Array notation
    RuleDef::php("array_syntax", "PHP arrays should be declared using the configured syntax"),
    RuleDef::php(
        "no_whitespace_before_comma_in_array",
        "No whitespace before commas in array declarations",
    ),
    RuleDef::php(
        "whitespace_after_comma_in_array",
        "A single space after each comma in array declarations",
    ),
    RuleDef::php("trim_array_spaces", "Arrays should be formatted like function parameters"),
    RuleDef::php(
        "normalize_index_brace",
        "Array index should always be written using square braces",
    ),
    RuleDef::php("array_indentation", "Each element of an array must be indented exactly once"),
    // Basic
    RuleDef::php("encoding", "PHP code must use only UTF-8 without BOM"),
    RuleDef::php("braces_position", "Braces must be placed as configured"),
    RuleDef::php(
        "no_multiple_statements_per_line",
        "There must not be more than one statement per line",
    ),
    RuleDef::php("octal_notation", "Literal octal must be in 0o notation"),
    RuleDef::php(
        "single_line_empty_body",
        "Empty body of class, interface, trait, enum or function must be abbreviated as {}",
    ),
    // Casing
    RuleDef::php(
        "constant_case",
        "The PHP constants true, false, and null must be written using the correct casing",
    ),
    RuleDef::php("lowercase_keywords", "PHP keywords must be in lower case"),
    RuleDef::php(
        "lowercase_static_reference",
        "Class static references self, static and parent must be in lower case",
    ),
    RuleDef::php(
        "magic_constant_casing",
        "Magic constants should be referred to using the correct casing",
    ),
    RuleDef::php(
        "magic_method_casing",
        "Magic method definitions and calls must be using the correct casing",
    ),
    RuleDef::php(
        "native_function_casing",
        "Function defined by PHP should be called using the correct casing",
    ),
    // Cast notation
    RuleDef::php("cast_spaces", "A single space or none should be between cast and variable"),
    RuleDef::php(
        "no_short_bool_cast",
        "Short cast bool using double exclamation mark should not be used",
    ),
    RuleDef::php("no_unset_cast", "Variables must be set null instead of using (unset) casting"),
    RuleDef::php(
        "short_scalar_cast",
        "Cast (boolean) and (integer) should be written as (bool) and (int)",
    ),
    // Class notation
    RuleDef::php(
        "class_attributes_separation",
        "Class, trait and interface elements must be separated with one or none blank line",
    ),
    RuleDef::php(
        "class_definition",
        "Whitespace around the keywords of a class, trait, enum or interfaces definition",
    ),
    RuleDef::php(
        "no_blank_lines_after_class_opening",
        "There should be no empty lines after class opening brace",
    ),
    RuleDef::php(
        "no_null_property_initialization",
        "Properties must not be explicitly initialized with null",
    ),
    RuleDef::risky("no_php4_constructor", "Convert PHP4-style constructors to __construct"),
    RuleDef::php("ordered_class_elements", "Orders the elements of classes, interfaces and traits"),
    RuleDef::risky(
        "self_accessor",
        "Inside class or interface element self should be preferred to the class name itself",
    ),
    RuleDef::php(
        "single_class_element_per_statement",
        "There must be one property or constant per statement",
    ),
    RuleDef::php(
        "single_trait_insert_per_statement",
        "Each trait use must be done as single statement",
    ),
    RuleDef::php(
        "visibility_required",
        "Classes, constants, properties and methods must have visibility declared",
    ),
    RuleDef::risky(
        "get_class_to_class_keyword",
        "Replace get_class calls on object variables with class keyword syntax",
    ),
    // Comment
    RuleDef::php(
        "no_trailing_whitespace_in_comment",
        "There must be no trailing spaces inside comment or PHPDoc",
    ),
    RuleDef::php("single_line_comment_style", "Single-line comments must use the configured style"),
    // Control structure
    RuleDef::php(
        "control_structure_braces",
        "The body of each control structure must be enclosed within braces",
    ),
    RuleDef::php(
        "control_structure_continuation_position",
        "Control structure continuation keyword must be on the configured line",
    ),
    RuleDef::php("elseif", "The keyword elseif should be used instead of else if"),
    RuleDef::php(
        "no_alternative_syntax",
        "Replace control structure alternative syntax to use braces",
    ),
    RuleDef::php("no_superfluous_elseif", "Replaces superfluous elseif with if"),
    RuleDef::php(
        "no_unneeded_braces",
        "Removes unneeded braces that are superfluous and aren't part of a control structure's body",
    ),
    RuleDef::php("no_useless_else", "There should not be useless else cases"),
    RuleDef::php(
        "simplified_if_return",
        "Simplify if control structures that return the boolean result of their condition",
    ),
    RuleDef::php(
        "switch_case_semicolon_to_colon",
        "A case should be followed by a colon and not a semicolon",
    ),
    RuleDef::php("switch_case_space", "Removes extra spaces between colon and case value"),
    RuleDef::php(
        "trailing_comma_in_multiline",
        "Multi-line arrays, arguments and parameters must have a trailing comma",
    ),
    // Function notation
    RuleDef::risky(
        "combine_nested_dirname",
        "Replace multiple nested calls of dirname by only one call",
    ),
    RuleDef::php(
        "compact_nullable_type_declaration",
        "Remove extra spaces in a nullable type declaration",
    ),
    RuleDef::php(
        "function_declaration",
        "Spaces should be properly placed in a function declaration",
    ),
    RuleDef::risky(
        "implode_call",
        "Function implode must be called with 2 arguments in the documented order",
    ),
    RuleDef::php(
        "method_argument_space",
        "In method arguments and method call, there must not be a space before each comma",
    ),
    RuleDef::php(
        "no_spaces_after_function_name",
        "There must not be a space between the method or function name and the opening parenthesis",
    ),
    RuleDef::risky(
        "no_unreachable_default_argument_value",
        "In function arguments there must not be arguments with default values before non-default ones",
    ),
    RuleDef::php(
        "nullable_type_declaration_for_default_null_value",
        "Adds or removes ? before single type declarations with null default",
    ),
    RuleDef::php(
        "return_type_declaration",
        "Adjust spacing around colon in return type declarations",
    ),
    RuleDef::php("single_line_throw", "Throwing exception must be done in single line"),
    RuleDef::risky(
        "use_arrow_functions",
        "Anonymous functions with return as the only statement must use arrow functions",
    ),
    // Import
    RuleDef::php(
        "fully_qualified_strict_types",
        "Removes the leading part of fully qualified symbol references if a given symbol is imported",
    ),
    RuleDef::php(
        "global_namespace_import",
        "Imports or fully qualifies global classes, functions and constants",
    ),
    RuleDef::php("no_leading_import_slash", "Remove leading slashes in use clauses"),
    RuleDef::php("no_unused_imports", "Unused use statements must be removed"),
    RuleDef::php("ordered_imports", "Ordering use statements"),
    RuleDef::php("single_import_per_statement", "There must be one use keyword per declaration"),
    RuleDef::php(
        "single_line_after_imports",
        "Each namespace use must go on its own line and there must be one blank line after the use block",
    ),
    // Language construct
    RuleDef::php(
        "declare_equal_normalize",
        "Equal sign in declare statement should be surrounded by spaces or not",
    ),
    RuleDef::php(
        "declare_parentheses",
        "There must not be spaces around declare statement parentheses",
    ),
    RuleDef::php(
        "single_space_around_construct",
        "Ensures a single space after language constructs",
    ),
    // List notation
    RuleDef::php("list_syntax", "List should be declared using the configured syntax"),
    // Namespace notation
    RuleDef::php(
        "blank_line_after_namespace",
        "There must be one blank line after the namespace declaration",
    ),
    RuleDef::php("clean_namespace", "Namespace must not contain spacing, comments or PHPDoc"),
    RuleDef::php(
        "no_leading_namespace_whitespace",
        "The namespace declaration line shouldn't contain leading whitespace",
    ),
    // Operator
    RuleDef::php(
        "assign_null_coalescing_to_coalesce_equal",
        "Use the null coalescing assignment operator ??= where possible",
    ),
    RuleDef::php(
        "binary_operator_spaces",
        "Binary operators should be surrounded by space as configured",
    ),
    RuleDef::php("concat_space", "Concatenation should be spaced according to configuration"),
    RuleDef::php(
        "new_with_parentheses",
        "All instances created with new keyword must be followed by parentheses",
    ),
    RuleDef::php(
        "not_operator_with_successor_space",
        "Logical NOT operators should have one trailing whitespace",
    ),
    RuleDef::php(
        "object_operator_without_whitespace",
        "There should not be space before or after object operators",
    ),
    RuleDef::php(
        "operator_linebreak",
        "Operators must always be at the beginning or at the end of the line",
    ),
    RuleDef::php("ternary_operator_spaces", "Standardize spaces around ternary operator"),
    RuleDef::php("ternary_to_null_coalescing", "Use null coalescing operator ?? where possible"),
    RuleDef::php(
        "unary_operator_spaces",
        "Unary operators should be placed adjacent to their operands",
    ),
    RuleDef::php("no_space_around_double_colon", "There must be no space around double colons"),
    // PHP tag
    RuleDef::php(
        "blank_line_after_opening_tag",
        "Ensure there is no code on the same line as the PHP open tag",
    ),
    RuleDef::php("full_opening_tag", "PHP code must use the long <?php tags"),
    RuleDef::php(
        "no_closing_tag",
        "The closing ?> tag must be omitted from files containing only PHP",
    ),
    // PHPDoc
    RuleDef::php("general_phpdoc_tag_rename", "Renames PHPDoc tags"),
    RuleDef::php(
        "no_blank_lines_after_phpdoc",
        "There should not be blank lines between docblock and the documented element",
    ),
    RuleDef::php("no_empty_phpdoc", "There should not be empty PHPDoc blocks"),
    RuleDef::php(
        "no_superfluous_phpdoc_tags",
        "Removes @param, @return and @var tags that don't provide any useful information",
    ),
    RuleDef::php(
        "phpdoc_align",
        "All items of the given PHPDoc tags must be aligned as configured",
    ),
    RuleDef::php(
        "phpdoc_indent",
        "Docblocks should have the same indentation as the documented subject",
    ),
    RuleDef::php("phpdoc_line_span", "Changes doc blocks from single to multi line, or reversed"),
    RuleDef::php(
        "phpdoc_no_empty_return",
        "@return void and @return null annotations should be omitted from PHPDoc",
    ),
    RuleDef::php("phpdoc_order", "Annotations in PHPDoc should be ordered in defined sequence"),
    RuleDef::risky(
        "phpdoc_readonly_class_comment_to_keyword",
        "Converts readonly comment on classes to the readonly keyword",
    ),
    RuleDef::php("phpdoc_scalar", "Scalar types should always be written in the same form"),
    RuleDef::php("phpdoc_separation", "Annotations in PHPDoc should be grouped together"),
    RuleDef::php(
        "phpdoc_single_line_var_spacing",
        "Single line @var PHPDoc should have proper spacing",
    ),
    RuleDef::php(
        "phpdoc_summary",
        "PHPDoc summary should end in either a full stop, exclamation mark, or question mark",
    ),
    RuleDef::php("phpdoc_to_comment", "Docblocks should only be used on structural elements"),
    RuleDef::php("phpdoc_trim", "PHPDoc should start and end with content"),
    RuleDef::php(
        "phpdoc_trim_consecutive_blank_line_separation",
        "Removes extra blank lines after summary and after description in PHPDoc",
    ),
    RuleDef::php("phpdoc_types", "The correct case must be used for standard PHP types in PHPDoc"),
    RuleDef::php("phpdoc_types_order", "Sorts PHPDoc types"),
    RuleDef::php(
        "phpdoc_var_without_name",
        "@var and @type annotations of classy properties should not contain the name",
    ),
    // Return notation
    RuleDef::php(
        "no_useless_return",
        "There should not be an empty return statement at the end of a function",
    ),
    RuleDef::php(
        "return_assignment",
        "Local, dynamic and directly referenced variables should not be assigned and directly returned",
    ),
    RuleDef::php(
        "simplified_null_return",
        "A return statement wishing to return void should not return null",
    ),
    // Semicolon
    RuleDef::php(
        "multiline_whitespace_before_semicolons",
        "Forbid multi-line whitespace before the closing semicolon",
    ),
    RuleDef::php("no_empty_statement", "Remove useless semicolons"),
    RuleDef::php(
        "no_singleline_whitespace_before_semicolons",
        "Single-line whitespace before closing semicolon are prohibited",
    ),
    // Strict
    RuleDef::risky("declare_strict_types", "Force strict types declaration in all files"),
    RuleDef::risky("strict_comparison", "Comparisons should be strict"),
    RuleDef::risky("strict_param", "Functions should be used with $strict param set to true"),
    // String notation
    RuleDef::php(
        "explicit_string_variable",
        "Converts implicit variables into explicit ones in double-quoted strings or heredoc syntax",
    ),
    RuleDef::php("heredoc_indentation", "Heredoc/nowdoc content must be properly indented"),
    RuleDef::risky(
        "no_trailing_whitespace_in_string",
        "There must be no trailing whitespace in strings",
    ),
    RuleDef::php(
        "simple_to_complex_string_variable",
        "Converts explicit variables in double-quoted strings and heredoc syntax from simple to complex format",
    ),
    RuleDef::php("single_quote", "Convert double quotes to single quotes for simple strings"),
    // Whitespace
    RuleDef::php(
        "blank_line_before_statement",
        "An empty line feed must precede any configured statement",
    ),
    RuleDef::php("indentation_type", "Code must use configured indentation type"),
    RuleDef::php("line_ending", "All PHP files must use same line ending"),
    RuleDef::php("method_chaining_indentation", "Method chaining must be properly indented"),
    RuleDef::php(
        "no_extra_blank_lines",
        "Removes extra blank lines and/or blank lines following configuration",
    ),
    RuleDef::php("no_spaces_around_offset", "There must not be spaces around offset braces"),
    RuleDef::php(
        "no_trailing_whitespace",
        "Remove trailing whitespace at the end of non-blank lines",
    ),
    RuleDef::php(
        "no_whitespace_in_blank_line",
        "Remove trailing whitespace at the end of blank lines",
    ),
    RuleDef::php(
        "single_blank_line_at_end_of_file",
        "A PHP file without end tag must always end with a single empty line feed",
    ),
];

const DEFAULTS: &[(&str, &str, &str)] = &[
    ("array_syntax", "syntax", "short"),
    ("concat_space", "spacing", "one"),
    ("cast_spaces", "space", "single"),
    ("indentation_type", "indent", "    "),
    ("line_ending", "line_ending", "\n"),
    ("binary_operator_spaces", "default", "single_space"),
    ("list_syntax", "syntax", "short"),
    ("declare_equal_normalize", "space", "none"),
];
