//! VHDL-aware template parameter types used by the design prototypes.

use nnhdl_template::{
    placeholder, AnalysingTemplateParameterType, ParameterMatch, TemplateParameterType,
};

/// A pattern that never matches: a boundary and a non-boundary at once.
const NEVER: &str = r"(?P<{value}>\b\B)";

/// Renames the first entity declared in the prototype.
///
/// The analysis pass finds the identifier of every `entity <x> is`; only the
/// first one is renamed. Substitution replaces every occurrence of that
/// identifier, including as the prefix of longer identifiers such as
/// `<x>_w_rom`, so dependent entity names follow the rename. VHDL identifiers
/// are case-insensitive, and so is the match.
#[derive(Debug, Clone, Copy, Default)]
pub struct EntityName;

impl AnalysingTemplateParameterType for EntityName {
    fn analyse_regex(&self) -> String {
        r"(?i)\bentity\s+(?P<{value}>[a-z][a-z0-9_]*)\s+is\b".to_string()
    }

    fn analyse(&self, m: &ParameterMatch<'_, '_>) -> Option<String> {
        m.group().map(|g| g.as_str().to_string())
    }

    fn regex(&self, findings: &[String]) -> String {
        match findings.first() {
            Some(name) => format!(r"(?i)\b(?P<{{value}}>{})", regex::escape(name)),
            None => NEVER.to_string(),
        }
    }

    fn replace(&self, m: &ParameterMatch<'_, '_>) -> String {
        placeholder(m.name())
    }
}

/// Turns the default value of an integer generic into a placeholder.
///
/// The generic is the one whose identifier equals the registered parameter
/// name, e.g. `DATA_WIDTH : integer := 16` for a parameter named `DATA_WIDTH`.
#[derive(Debug, Clone, Copy, Default)]
pub struct GenericDefault;

impl TemplateParameterType for GenericDefault {
    fn regex(&self) -> String {
        r"\b{value}\s*:\s*(?:integer|natural|positive)\s*:=\s*(?P<{value}>-?\d+)".to_string()
    }

    fn replace(&self, m: &ParameterMatch<'_, '_>) -> String {
        m.splice_group(&placeholder(m.name()))
    }
}

/// Turns the string value of an attribute specification into a placeholder,
/// e.g. the `"auto"` in `attribute rom_style of ROM : signal is "auto";`.
#[derive(Debug, Clone)]
pub struct AttributeValue {
    attribute: String,
}

impl AttributeValue {
    /// Targets specifications of `attribute`.
    pub fn new(attribute: impl Into<String>) -> Self {
        Self {
            attribute: attribute.into(),
        }
    }
}

impl TemplateParameterType for AttributeValue {
    fn regex(&self) -> String {
        format!(
            r#"\battribute\s+{}\s+of\s+\w+\s*:\s*\w+\s+is\s+"(?P<{{value}}>[^"]*)""#,
            regex::escape(&self.attribute)
        )
    }

    fn replace(&self, m: &ParameterMatch<'_, '_>) -> String {
        m.splice_group(&placeholder(m.name()))
    }
}

/// Turns the aggregate initializer of a signal or constant into a placeholder,
/// e.g. the element list in `signal ROM : rom_array := ("00", "01");`.
#[derive(Debug, Clone)]
pub struct ArrayLiteral {
    object: String,
}

impl ArrayLiteral {
    /// Targets the declaration of the signal or constant `object`.
    pub fn new(object: impl Into<String>) -> Self {
        Self {
            object: object.into(),
        }
    }
}

impl TemplateParameterType for ArrayLiteral {
    fn regex(&self) -> String {
        format!(
            r"\b(?:signal|constant)\s+{}\s*:\s*\w+\s*:=\s*\((?P<{{value}}>[^;]*)\)\s*;",
            regex::escape(&self.object)
        )
    }

    fn replace(&self, m: &ParameterMatch<'_, '_>) -> String {
        m.splice_group(&placeholder(m.name()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nnhdl_template::{ParameterType, TemplateBuilder, TemplateParameters};

    fn mapping(pairs: &[(&str, &str)]) -> TemplateParameters {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), (*v).into()))
            .collect()
    }

    #[test]
    fn entity_name_renames_declaration_and_prefixed_identifiers() {
        let template = TemplateBuilder::new()
            .set_prototype_lines([
                "entity proto is",
                "end entity proto;",
                "architecture rtl of proto is",
                "begin",
                "\trom : entity work.proto_rom(rtl);",
                "end architecture rtl;",
            ])
            .add_parameter("name", ParameterType::analysing(EntityName))
            .build()
            .unwrap();
        assert_eq!(
            template.render(&mapping(&[("name", "fc1")])).unwrap(),
            "entity fc1 is\nend entity fc1;\narchitecture rtl of fc1 is\nbegin\n\trom : entity work.fc1_rom(rtl);\nend architecture rtl;"
        );
    }

    #[test]
    fn entity_name_keeps_first_declaration() {
        let template = TemplateBuilder::new()
            .set_prototype("entity first is\nentity second is")
            .add_parameter("name", ParameterType::analysing(EntityName))
            .build()
            .unwrap();
        assert_eq!(template.text(), "entity ${name} is\nentity second is");
    }

    #[test]
    fn entity_name_follows_a_new_prototype() {
        let builder = TemplateBuilder::new()
            .set_prototype("entity alpha is\nend entity alpha;")
            .add_parameter("name", ParameterType::analysing(EntityName));
        let expected = "entity ${name} is\nend entity ${name};";
        assert_eq!(builder.build().unwrap().text(), expected);

        let builder = builder.set_prototype("entity beta is\nend entity beta;");
        assert_eq!(builder.build().unwrap().text(), expected);
    }

    #[test]
    fn entity_name_clones_do_not_share_findings() {
        let base = TemplateBuilder::new().add_parameter("name", ParameterType::analysing(EntityName));
        let alpha = base.clone().set_prototype("entity alpha is end entity alpha;");
        let beta = base.set_prototype("entity beta is end entity beta;");
        assert_eq!(
            alpha.build().unwrap().text(),
            "entity ${name} is end entity ${name};"
        );
        assert_eq!(
            beta.build().unwrap().text(),
            "entity ${name} is end entity ${name};"
        );
    }

    #[test]
    fn entity_name_ignores_case() {
        let template = TemplateBuilder::new()
            .set_prototype("ENTITY Proto IS\nend entity proto;")
            .add_parameter("name", ParameterType::analysing(EntityName))
            .build()
            .unwrap();
        assert_eq!(template.text(), "ENTITY ${name} IS\nend entity ${name};");
    }

    #[test]
    fn entity_name_without_entity_leaves_text_alone() {
        let template = TemplateBuilder::new()
            .set_prototype("package p is end package p;")
            .add_parameter("name", ParameterType::analysing(EntityName))
            .build()
            .unwrap();
        assert_eq!(template.text(), "package p is end package p;");
    }

    #[test]
    fn generic_default_replaces_only_the_value() {
        let template = TemplateBuilder::new()
            .set_prototype("\t\tDATA_WIDTH : integer := 16;\n\tsignal x : signed(DATA_WIDTH-1 downto 0);")
            .add_parameter("DATA_WIDTH", ParameterType::plain(GenericDefault))
            .build()
            .unwrap();
        assert_eq!(
            template.text(),
            "\t\tDATA_WIDTH : integer := ${DATA_WIDTH};\n\tsignal x : signed(DATA_WIDTH-1 downto 0);"
        );
        assert_eq!(
            template.render(&mapping(&[("DATA_WIDTH", "8")])).unwrap(),
            "\t\tDATA_WIDTH : integer := 8;\n\tsignal x : signed(DATA_WIDTH-1 downto 0);"
        );
    }

    #[test]
    fn generic_default_does_not_match_similar_names() {
        let template = TemplateBuilder::new()
            .set_prototype("X_ADDR_WIDTH : integer := 3;\nADDR_WIDTH : integer := 2;")
            .add_parameter("ADDR_WIDTH", ParameterType::plain(GenericDefault))
            .build()
            .unwrap();
        assert_eq!(
            template.text(),
            "X_ADDR_WIDTH : integer := 3;\nADDR_WIDTH : integer := ${ADDR_WIDTH};"
        );
    }

    #[test]
    fn attribute_value() {
        let template = TemplateBuilder::new()
            .set_prototype("attribute rom_style : string;\nattribute rom_style of ROM : signal is \"auto\";")
            .add_parameter(
                "rom_style",
                ParameterType::plain(AttributeValue::new("rom_style")),
            )
            .build()
            .unwrap();
        assert_eq!(
            template.render(&mapping(&[("rom_style", "block")])).unwrap(),
            "attribute rom_style : string;\nattribute rom_style of ROM : signal is \"block\";"
        );
    }

    #[test]
    fn array_literal() {
        let template = TemplateBuilder::new()
            .set_prototype("signal ROM : rom_array := (\"00\", \"01\");")
            .add_parameter("rom_values", ParameterType::plain(ArrayLiteral::new("ROM")))
            .build()
            .unwrap();
        assert_eq!(template.text(), "signal ROM : rom_array := (${rom_values});");
        assert_eq!(
            template
                .render(&mapping(&[("rom_values", "\"11\", \"10\"")]))
                .unwrap(),
            "signal ROM : rom_array := (\"11\", \"10\");"
        );
    }
}
