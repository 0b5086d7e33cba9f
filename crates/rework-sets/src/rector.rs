//! Rector sets: PHP level upgrades and the TYPO3 migrations
//!
//! Set identifiers are written the way a `rector.php` names them
//! (`LevelSetList::UP_TO_PHP_82`), rules by their short class name.

use rework_core::Tool;

use crate::registry::{RuleDef, SetDef, ToolTables};

pub static TABLES: ToolTables = ToolTables {
    tool: Tool::Rector,
    sets: SETS,
    rules: RULES,
    defaults: DEFAULTS,
};

const SETS: &[SetDef] = &[
    // PHP versions
    SetDef {
        id: "SetList::PHP_74",
        description: "PHP 7.4 language features",
        members: &[
            "ClosureToArrowFunctionRector",
            "NullCoalescingOperatorRector",
            "CurlyToSquareBracketArrayStringRector",
            "ParenthesizeNestedTernaryRector",
            "RestoreDefaultNullToNullableTypePropertyRector",
        ],
    },
    SetDef {
        id: "SetList::PHP_80",
        description: "PHP 8.0 language features",
        members: &[
            "ClassPropertyAssignToConstructorPromotionRector",
            "StrContainsRector",
            "StrStartsWithRector",
            "StrEndsWithRector",
            "GetDebugTypeRector",
            "ChangeSwitchToMatchRector",
            "RemoveUnusedVariableInCatchRector",
            "ClassOnObjectRector",
            "StringableForToStringRector",
        ],
    },
    SetDef {
        id: "SetList::PHP_81",
        description: "PHP 8.1 language features",
        members: &[
            "FirstClassCallableRector",
            "ReadOnlyPropertyRector",
            "NullToStrictStringFuncCallArgRector",
            "NewInInitializerRector",
        ],
    },
    SetDef {
        id: "SetList::PHP_82",
        description: "PHP 8.2 language features",
        members: &[
            "ReadOnlyClassRector",
            "Utf8DecodeEncodeToMbConvertEncodingRector",
            "VariableInStringInterpolationFixerRector",
            "FilesystemIteratorSkipDotsRector",
        ],
    },
    SetDef {
        id: "LevelSetList::UP_TO_PHP_74",
        description: "Everything up to PHP 7.4",
        members: &["SetList::PHP_74"],
    },
    SetDef {
        id: "LevelSetList::UP_TO_PHP_80",
        description: "Everything up to PHP 8.0",
        members: &["LevelSetList::UP_TO_PHP_74", "SetList::PHP_80"],
    },
    SetDef {
        id: "LevelSetList::UP_TO_PHP_81",
        description: "Everything up to PHP 8.1",
        members: &["LevelSetList::UP_TO_PHP_80", "SetList::PHP_81"],
    },
    SetDef {
        id: "LevelSetList::UP_TO_PHP_82",
        description: "Everything up to PHP 8.2",
        members: &["LevelSetList::UP_TO_PHP_81", "SetList::PHP_82"],
    },
    // Generic quality sets
    SetDef {
        id: "SetList::DEAD_CODE",
        description: "Remove unused and unreachable code",
        members: &[
            "RemoveParentCallWithoutParentRector",
            "RemoveUnusedPrivateMethodRector",
            "RemoveUselessParamTagRector",
            "RemoveUselessReturnTagRector",
            "RemoveDeadReturnRector",
        ],
    },
    SetDef {
        id: "SetList::TYPE_DECLARATION",
        description: "Add type declarations inferred from code",
        members: &[
            "ReturnTypeFromStrictNativeCallRector",
            "TypedPropertyFromAssignsRector",
            "AddVoidReturnTypeWhereNoReturnRector",
        ],
    },
    // TYPO3
    SetDef {
        id: "Typo3SetList::TYPO3_11",
        description: "TYPO3 v11 core API migrations",
        members: &[
            "SubstituteEnvironmentServiceWithApplicationTypeRector",
            "ExtbaseControllerActionsMustReturnResponseInterfaceRector",
            "ReplaceInjectAnnotationWithMethodRector",
            "ForwardResponseInsteadOfForwardMethodRector",
        ],
    },
    SetDef {
        id: "Typo3SetList::TYPO3_12",
        description: "TYPO3 v12 core API migrations",
        members: &[
            "MigrateQueryBuilderExecuteRector",
            "ReplaceTSFEWithContextMethodsRector",
            "RemoveTSFEConvOutputCharsetCallsRector",
            "MigrateRequestArgumentFromMethodStartRector",
            "ImplementSiteLanguageAwareInterfaceRector",
            "UseConfigArrayForTSFEPropertiesRector",
        ],
    },
    SetDef {
        id: "Typo3SetList::TYPO3_13",
        description: "TYPO3 v13 core API migrations",
        members: &[
            "MigrateExtbaseHashServiceToUseCoreHashServiceRector",
            "MigrateFrontendUserAttributeRector",
            "MigratePageInformationAttributeRector",
            "StrictTypesForPropertiesInAbstractRepositoryRector",
        ],
    },
    SetDef {
        id: "Typo3LevelSetList::UP_TO_TYPO3_11",
        description: "TYPO3 migrations up to v11",
        members: &["Typo3SetList::TYPO3_11"],
    },
    SetDef {
        id: "Typo3LevelSetList::UP_TO_TYPO3_12",
        description: "TYPO3 migrations up to v12",
        members: &["Typo3LevelSetList::UP_TO_TYPO3_11", "Typo3SetList::TYPO3_12"],
    },
    SetDef {
        id: "Typo3LevelSetList::UP_TO_TYPO3_13",
        description: "TYPO3 migrations up to v13",
        members: &["Typo3LevelSetList::UP_TO_TYPO3_12", "Typo3SetList::TYPO3_13"],
    },
    SetDef {
        id: "Typo3SetList::CODE_QUALITY",
        description: "TYPO3 extension code quality",
        members: &[
            "AddErrorCodeToExceptionRector",
            "InjectMethodToConstructorInjectionRector",
            "UseExtensionConfigurationApiRector",
            "ConvertImplicitVariablesToExplicitGlobalsRector",
        ],
    },
    SetDef {
        id: "Typo3SetList::GENERAL",
        description: "General TYPO3 extension housekeeping",
        members: &[
            "ExtEmConfRector",
            "MethodGetInstanceToMakeInstanceCallRector",
            "ConvertImplicitVariablesToExplicitGlobalsRector",
        ],
    },
];

const RULES: &[RuleDef] = &[
    // PHP 7.4
    RuleDef::php(
        "ClosureToArrowFunctionRector",
        "Change closure to arrow function",
    ),
    RuleDef::php(
        "NullCoalescingOperatorRector",
        "Use null coalescing operator ??=",
    ),
    RuleDef::php(
        "CurlyToSquareBracketArrayStringRector",
        "Change curly based array and string to square bracket",
    ),
    RuleDef::php(
        "ParenthesizeNestedTernaryRector",
        "Add parentheses to nested ternary",
    ),
    RuleDef::php(
        "RestoreDefaultNullToNullableTypePropertyRector",
        "Add null default to properties with nullable type",
    ),
    // PHP 8.0
    RuleDef::php(
        "ClassPropertyAssignToConstructorPromotionRector",
        "Change simple property init and assign to constructor promotion",
    ),
    RuleDef::php("StrContainsRector", "Replace strpos() !== false with str_contains()"),
    RuleDef::php("StrStartsWithRector", "Change helper functions to str_starts_with()"),
    RuleDef::php("StrEndsWithRector", "Change helper functions to str_ends_with()"),
    RuleDef::php("GetDebugTypeRector", "Change ternary type resolve to get_debug_type()"),
    RuleDef::php("ChangeSwitchToMatchRector", "Change switch() to match()"),
    RuleDef::php(
        "RemoveUnusedVariableInCatchRector",
        "Remove unused variable in catch()",
    ),
    RuleDef::php("ClassOnObjectRector", "Change get_class($object) to $object::class"),
    RuleDef::php(
        "StringableForToStringRector",
        "Add Stringable interface to classes with __toString()",
    ),
    // PHP 8.1
    RuleDef::php(
        "FirstClassCallableRector",
        "Upgrade array callable to first class callable",
    ),
    RuleDef::php(
        "ReadOnlyPropertyRector",
        "Decorate read-only property with readonly attribute",
    ),
    RuleDef::php(
        "NullToStrictStringFuncCallArgRector",
        "Change null to strict string defined function call args",
    ),
    RuleDef::php(
        "NewInInitializerRector",
        "Replace property declaration of new state with direct new",
    ),
    // PHP 8.2
    RuleDef::php("ReadOnlyClassRector", "Decorate read-only class with readonly attribute"),
    RuleDef::php(
        "Utf8DecodeEncodeToMbConvertEncodingRector",
        "Change deprecated utf8_decode and utf8_encode to mb_convert_encoding",
    ),
    RuleDef::php(
        "VariableInStringInterpolationFixerRector",
        "Replace deprecated \"${var}\" to \"{$var}\"",
    ),
    RuleDef::php(
        "FilesystemIteratorSkipDotsRector",
        "Prior PHP 8.2 FilesystemIterator::SKIP_DOTS was always set",
    ),
    // Dead code
    RuleDef::php(
        "RemoveParentCallWithoutParentRector",
        "Remove unused parent call with no parent class",
    ),
    RuleDef::php("RemoveUnusedPrivateMethodRector", "Remove unused private method"),
    RuleDef::php(
        "RemoveUselessParamTagRector",
        "Remove @param docblock with same type as parameter type",
    ),
    RuleDef::php(
        "RemoveUselessReturnTagRector",
        "Remove @return docblock with same type as defined in PHP",
    ),
    RuleDef::php("RemoveDeadReturnRector", "Remove last return in the functions"),
    // Type declarations
    RuleDef::php(
        "ReturnTypeFromStrictNativeCallRector",
        "Add strict return type based on native function or class method return",
    ),
    RuleDef::php(
        "TypedPropertyFromAssignsRector",
        "Add typed property from assigned types",
    ),
    RuleDef::php(
        "AddVoidReturnTypeWhereNoReturnRector",
        "Add return type void to function like without any return",
    ),
    // TYPO3 v11
    RuleDef::php(
        "SubstituteEnvironmentServiceWithApplicationTypeRector",
        "Substitute EnvironmentService with ApplicationType",
    ),
    RuleDef::php(
        "ExtbaseControllerActionsMustReturnResponseInterfaceRector",
        "Extbase controller actions must return ResponseInterface",
    ),
    RuleDef::php(
        "ReplaceInjectAnnotationWithMethodRector",
        "Turn @inject annotations into inject methods",
    ),
    RuleDef::php(
        "ForwardResponseInsteadOfForwardMethodRector",
        "Return ForwardResponse instead of calling forward()",
    ),
    // TYPO3 v12
    RuleDef::php(
        "MigrateQueryBuilderExecuteRector",
        "Replace QueryBuilder::execute() with executeQuery() or executeStatement()",
    ),
    RuleDef::php(
        "ReplaceTSFEWithContextMethodsRector",
        "Replace TSFE calls with Context API",
    ),
    RuleDef::php(
        "RemoveTSFEConvOutputCharsetCallsRector",
        "Remove TSFE->convOutputCharset() calls",
    ),
    RuleDef::php(
        "MigrateRequestArgumentFromMethodStartRector",
        "Pass the request to ContentObjectRenderer::start()",
    ),
    RuleDef::php(
        "ImplementSiteLanguageAwareInterfaceRector",
        "Implement SiteLanguageAwareInterface instead of the trait",
    ),
    RuleDef::php(
        "UseConfigArrayForTSFEPropertiesRector",
        "Read former TSFE properties from the config array",
    ),
    // TYPO3 v13
    RuleDef::php(
        "MigrateExtbaseHashServiceToUseCoreHashServiceRector",
        "Use the core HashService instead of the Extbase one",
    ),
    RuleDef::php(
        "MigrateFrontendUserAttributeRector",
        "Read the frontend user from the request attribute",
    ),
    RuleDef::php(
        "MigratePageInformationAttributeRector",
        "Read page information from the frontend.page.information attribute",
    ),
    RuleDef::php(
        "StrictTypesForPropertiesInAbstractRepositoryRector",
        "Add strict types to Extbase repository properties",
    ),
    // TYPO3 code quality and general
    RuleDef::php(
        "AddErrorCodeToExceptionRector",
        "Add a timestamp error code to exceptions",
    ),
    RuleDef::php(
        "InjectMethodToConstructorInjectionRector",
        "Replace inject methods with constructor injection",
    ),
    RuleDef::php(
        "UseExtensionConfigurationApiRector",
        "Use the ExtensionConfiguration API instead of $GLOBALS['TYPO3_CONF_VARS']['EXT']",
    ),
    RuleDef::php(
        "ConvertImplicitVariablesToExplicitGlobalsRector",
        "Convert $TYPO3_CONF_VARS to $GLOBALS['TYPO3_CONF_VARS']",
    ),
    RuleDef::php("ExtEmConfRector", "Clean up ext_emconf.php"),
    RuleDef::php(
        "MethodGetInstanceToMakeInstanceCallRector",
        "Use GeneralUtility::makeInstance() instead of getInstance()",
    ),
];

const DEFAULTS: &[(&str, &str, &str)] = &[
    ("ExtEmConfRector", "php_constraint", "8.2.0-8.3.99"),
    ("ExtEmConfRector", "typo3_constraint", "12.4.0-13.4.99"),
];
