//! Mapping from raw node types to exported entity type names.

/// Node types whose exported name is not derived from the type itself.
const OVERRIDES: &[(&str, &str)] = &[
    ("PageNode", "PageNode"),
    ("WebAuthnAuthenticationNode", "WebAuthnAuthenticationNode"),
    ("WebAuthnRegistrationNode", "WebAuthnRegistrationNode"),
    ("OneTimePasswordGeneratorNode", "HOTPGenerator"),
    ("OneTimePasswordSmtpSenderNode", "OTPEmailSender"),
    ("OneTimePasswordCollectorDecisionNode", "OTPCollectorDecision"),
    ("OneTimePasswordSmsSenderNode", "OTPSMSSender"),
    ("KbaCreateNode", "KBADefinition"),
    ("KbaDecisionNode", "KBADecision"),
    ("KbaVerifyNode", "KBAVerification"),
    ("ValidatedUsernameNode", "PlatformUsername"),
    ("ValidatedPasswordNode", "PlatformPassword"),
];

/// Returns the canonical entity type (and output directory name) for a
/// raw node type.
///
/// Types listed in the override table map to their fixed names. Any other
/// type loses one trailing `Node`, if it has one.
///
/// ```
/// use am_tree::canonical_type;
///
/// assert_eq!(canonical_type("KbaCreateNode"), "KBADefinition");
/// assert_eq!(canonical_type("CustomWidgetNode"), "CustomWidget");
/// assert_eq!(canonical_type("Unmapped"), "Unmapped");
/// ```
#[must_use]
pub fn canonical_type(node_type: &str) -> String {
    if let Some((_, name)) = OVERRIDES.iter().find(|(raw, _)| *raw == node_type) {
        return (*name).to_string();
    }
    node_type
        .strip_suffix("Node")
        .unwrap_or(node_type)
        .to_string()
}
