//! Fractor sets: TYPO3 migrations for non-PHP files

use rework_core::{FileKind, Tool};

use crate::registry::{RuleDef, SetDef, ToolTables};

pub static TABLES: ToolTables = ToolTables {
    tool: Tool::Fractor,
    sets: SETS,
    rules: RULES,
    defaults: DEFAULTS,
};

/// Root element of a FlexForm data structure
const FLEXFORM_ROOT: &str = "<T3DataStructure";

const SETS: &[SetDef] = &[
    SetDef {
        id: "Typo3SetList::TYPO3_12",
        description: "TYPO3 v12 FlexForm, TypoScript, Fluid and YAML migrations",
        members: &[
            "RemoveTceFormsDomElementFlexFormFractor",
            "MigrateRequiredFlagFlexFormFractor",
            "MigrateItemsIndexedKeysToAssociativeFractor",
            "MigrateIncludeTypoScriptSyntaxFractor",
            "RemoveConfigDoctypeSwitchFractor",
            "RemoveUseCacheHashFromTypolinkTypoScriptFractor",
            "AbstractMessageGetSeverityFluidFractor",
            "EmailFinisherYamlFractor",
            "TranslationFileYamlFractor",
        ],
    },
    SetDef {
        id: "Typo3SetList::TYPO3_13",
        description: "TYPO3 v13 FlexForm, TypoScript, Fluid and .htaccess migrations",
        members: &[
            "MigrateNullFlagFlexFormFractor",
            "RemoveNewContentElementWizardOptionsFractor",
            "RemoveNoCacheHashAndUseCacheHashAttributeFluidFractor",
            "MigrateHtaccessFilesMatchFractor",
        ],
    },
    SetDef {
        id: "Typo3LevelSetList::UP_TO_TYPO3_12",
        description: "Non-PHP TYPO3 migrations up to v12",
        members: &["Typo3SetList::TYPO3_12"],
    },
    SetDef {
        id: "Typo3LevelSetList::UP_TO_TYPO3_13",
        description: "Non-PHP TYPO3 migrations up to v13",
        members: &["Typo3LevelSetList::UP_TO_TYPO3_12", "Typo3SetList::TYPO3_13"],
    },
];

const FLEXFORM: &[FileKind] = &[FileKind::Xml];
const TYPOSCRIPT: &[FileKind] = &[FileKind::TypoScript];
const FLUID: &[FileKind] = &[FileKind::Fluid];
const YAML: &[FileKind] = &[FileKind::Yaml];
const HTACCESS: &[FileKind] = &[FileKind::Htaccess];

const fn flexform(id: &'static str, description: &'static str) -> RuleDef {
    RuleDef {
        id,
        description,
        kinds: FLEXFORM,
        risky: false,
        marker: Some(FLEXFORM_ROOT),
    }
}

const RULES: &[RuleDef] = &[
    // FlexForm
    flexform(
        "RemoveTceFormsDomElementFlexFormFractor",
        "Remove the <TCEforms> wrapper from FlexForm fields",
    ),
    flexform(
        "MigrateRequiredFlagFlexFormFractor",
        "Migrate eval=required to required=1",
    ),
    flexform(
        "MigrateItemsIndexedKeysToAssociativeFractor",
        "Migrate indexed select items to associative keys",
    ),
    flexform(
        "MigrateNullFlagFlexFormFractor",
        "Migrate eval=null to nullable=1",
    ),
    // TypoScript
    RuleDef::of_kind(
        "MigrateIncludeTypoScriptSyntaxFractor",
        "Migrate <INCLUDE_TYPOSCRIPT: to @import",
        TYPOSCRIPT,
    ),
    RuleDef::of_kind(
        "RemoveConfigDoctypeSwitchFractor",
        "Remove config.doctypeSwitch",
        TYPOSCRIPT,
    ),
    RuleDef::of_kind(
        "RemoveUseCacheHashFromTypolinkTypoScriptFractor",
        "Remove useCacheHash from typolink",
        TYPOSCRIPT,
    ),
    RuleDef::of_kind(
        "RemoveNewContentElementWizardOptionsFractor",
        "Remove mod.wizards.newContentElement options from page TSconfig",
        TYPOSCRIPT,
    ),
    // Fluid
    RuleDef::of_kind(
        "AbstractMessageGetSeverityFluidFractor",
        "Migrate message severity integers to ContextualFeedbackSeverity",
        FLUID,
    ),
    RuleDef::of_kind(
        "RemoveNoCacheHashAndUseCacheHashAttributeFluidFractor",
        "Remove noCacheHash and useCacheHash from link view helpers",
        FLUID,
    ),
    // YAML
    RuleDef::of_kind(
        "EmailFinisherYamlFractor",
        "Migrate form framework email finisher options",
        YAML,
    ),
    RuleDef::of_kind(
        "TranslationFileYamlFractor",
        "Migrate form framework translationFile to translationFiles",
        YAML,
    ),
    // .htaccess
    RuleDef::of_kind(
        "MigrateHtaccessFilesMatchFractor",
        "Update the FilesMatch deny list of the default .htaccess",
        HTACCESS,
    ),
];

const DEFAULTS: &[(&str, &str, &str)] = &[];
