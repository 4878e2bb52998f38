use std::borrow::Cow;
use std::fmt;

fn escape_backticks(input: &str) -> Cow<'_, str> {
    if input.contains('`') {
        Cow::Owned(input.replace('`', "\\`"))
    } else {
        Cow::Borrowed(input)
    }
}

/// Renders `items` as `[a, b, c]`, keeping the first occurrence of repeated entries.
pub fn bracketed_list<I, S>(items: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen: Vec<String> = Vec::new();
    for item in items {
        let item = item.as_ref();
        if !seen.iter().any(|existing| existing == item) {
            seen.push(item.to_string());
        }
    }
    format!("[{}]", seen.join(", "))
}

pub fn quoted(name: &str) -> String {
    format!("`{}`", escape_backticks(name))
}

fn format_member_error(
    action: &str,
    member_kind: &str,
    name: &str,
    owner: Option<(&str, &str)>,
    implementing: Option<&str>,
) -> String {
    let mut message = format!("Unable to {action} for the {member_kind} with name {name}");
    if let Some((owner_kind, owner_name)) = owner {
        message.push_str(&format!(" of {owner_kind} {owner_name}"));
    }
    if let Some(implementing) = implementing {
        message.push_str(&format!(" with the implementing class {implementing}"));
    }
    message.push('.');
    message
}

pub fn member_error(action: &str, member_kind: &str, name: &str, owner_kind: &str, owner: &str) -> String {
    format_member_error(action, member_kind, name, Some((owner_kind, owner)), None)
}

pub fn implementing_member_error(
    action: &str,
    member_kind: &str,
    name: &str,
    owner_kind: &str,
    owner: &str,
    implementing: &str,
) -> String {
    format_member_error(
        action,
        member_kind,
        name,
        Some((owner_kind, owner)),
        Some(implementing),
    )
}

pub fn missing_argument_error(argument: &str, annotation: impl fmt::Display) -> String {
    format!("Couldn't find {argument} for {annotation}.")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bracketed_list_keeps_first_occurrence() {
        assert_eq!(bracketed_list(["Foo", "Bar", "Foo"]), "[Foo, Bar]");
        assert_eq!(bracketed_list(Vec::<String>::new()), "[]");
    }

    #[test]
    fn member_error_names_owner_and_implementing_class() {
        assert_eq!(
            member_error("get type", "parameter", "value", "function", "app.Base.bind"),
            "Unable to get type for the parameter with name value of function app.Base.bind."
        );
        assert_eq!(
            implementing_member_error(
                "resolve type",
                "parameter",
                "value",
                "function",
                "app.Base.bind",
                "app.Impl"
            ),
            "Unable to resolve type for the parameter with name value of function \
             app.Base.bind with the implementing class app.Impl."
        );
    }

    #[test]
    fn quoted_escapes_backticks() {
        assert_eq!(quoted("a`b"), "`a\\`b`");
    }
}
