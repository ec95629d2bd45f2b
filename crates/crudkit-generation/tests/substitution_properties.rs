//! Property-based tests for placeholder substitution

use crudkit_generation::templates::{
    remove_unset_tags, substitute, substitute_tag, unresolved_tokens, Substitutions,
};
use proptest::prelude::*;

/// Template text that can never contain braces or line tags
fn plain_text_strategy() -> impl Strategy<Value = String> {
    "[a-z0-9 <>=\"'/\n]{0,80}"
}

fn token_name_strategy() -> impl Strategy<Value = String> {
    "[A-Za-z_][A-Za-z0-9_]{0,12}"
}

proptest! {
    /// Property: substituting a token that does not occur is the identity
    #[test]
    fn prop_substitute_absent_token_is_identity(
        template in plain_text_strategy(),
        name in token_name_strategy(),
        value in "[ -~]{0,20}",
    ) {
        let token = format!("{{{{{}}}}}", name);
        prop_assert_eq!(substitute(&template, &token, &value), template);
    }

    /// Property: after substitution no occurrence of the token remains
    #[test]
    fn prop_substitute_replaces_every_occurrence(
        before in plain_text_strategy(),
        after in plain_text_strategy(),
        name in token_name_strategy(),
        value in "[a-z ]{0,20}",
    ) {
        let token = format!("{{{{{}}}}}", name);
        let template = format!("{}{}{}{}", before, token, after, token);
        let result = substitute(&template, &token, &value);
        prop_assert!(!result.contains(&token));
        prop_assert_eq!(result, format!("{}{}{}{}", before, value, after, value));
    }

    /// Property: substitution order does not matter for distinct tokens
    #[test]
    fn prop_substitution_order_independent(
        a in token_name_strategy(),
        b in token_name_strategy(),
        x in "[a-z]{0,8}",
        y in "[a-z]{0,8}",
    ) {
        prop_assume!(a != b);
        let template = format!("{{{{{}}}}}-{{{{{}}}}}", a, b);
        let forward = Substitutions::new().with(a.clone(), x.clone()).with(b.clone(), y.clone());
        let backward = Substitutions::new().with(b.clone(), y.clone()).with(a.clone(), x.clone());
        prop_assert_eq!(forward.apply(&template), backward.apply(&template));
        prop_assert!(unresolved_tokens(&forward.apply(&template)).is_empty());
    }

    /// Property: line tags that are absent leave the template unchanged
    #[test]
    fn prop_absent_tag_is_identity(
        template in plain_text_strategy(),
        value in "[a-z\n]{0,20}",
    ) {
        prop_assert_eq!(substitute_tag(&template, "CONTENT", &value), template.clone());
        prop_assert_eq!(remove_unset_tags(&template), template);
    }

    /// Property: a filled tag keeps the text around it and indents every value line
    #[test]
    fn prop_tag_fill_preserves_surroundings(
        head in "[a-z ]{0,20}",
        tail in "[a-z ]{0,20}",
        indent in "[ ]{0,8}",
        lines in prop::collection::vec("[a-z<>]{1,10}", 1..5),
    ) {
        let template = format!("{}\n{}#CONTENT\n{}\n", head, indent, tail);
        let value = lines.join("\n");
        let expected_block: Vec<String> = lines.iter().map(|l| format!("{}{}", indent, l)).collect();
        let result = substitute_tag(&template, "CONTENT", &value);
        prop_assert_eq!(
            result,
            format!("{}\n{}\n{}\n", head, expected_block.join("\n"), tail)
        );
    }
}
