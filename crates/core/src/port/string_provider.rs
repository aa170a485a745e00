// Localization Port

/// String localization service
pub trait StringProvider: Send + Sync {
    /// Localized string `identifier` from `component`, with `{$a}`
    /// replaced by `arg` when given
    fn get_string(&self, identifier: &str, component: &str, arg: Option<&str>) -> String;
}

/// Bundled English strings for the `completion` component
pub struct EnglishStrings;

impl EnglishStrings {
    fn lookup(identifier: &str, component: &str) -> Option<&'static str> {
        if component != "completion" {
            return None;
        }
        match identifier {
            "activities" => Some("Activities"),
            "activitiescompleted" => Some("Activities completed"),
            "markingyourselfcomplete" => Some("Marking yourself complete"),
            "viewingactivity" => Some("Viewing the {$a}"),
            "achievinggrade" => Some("Achieving grade"),
            _ => None,
        }
    }
}

impl StringProvider for EnglishStrings {
    fn get_string(&self, identifier: &str, component: &str, arg: Option<&str>) -> String {
        match Self::lookup(identifier, component) {
            Some(template) => match arg {
                Some(a) => template.replace("{$a}", a),
                None => template.to_string(),
            },
            None => format!("[[{}]]", identifier),
        }
    }
}
