//! Design assembly: turning quantized parameters into VHDL source files.

use crate::error::TranslateError;
use crate::export::ParameterBundle;
use crate::params::{ArrayLiteral, AttributeValue, EntityName, GenericDefault};
use crate::prototypes;
use nnhdl_common::{is_basic_identifier, to_twos_complement, FixedPointConfig};
use nnhdl_config::{ResolvedLayer, ResourceOption};
use nnhdl_template::{Literal, ParameterType, TemplateBuilder, TemplateParameters, TemplateValue};
use nnhdl_vhdl::{
    precomputed_scalar_function_process, Architecture, CodeLines, DataType, Entity,
    InterfaceVariable, Library, Mode, Process,
};
use serde::Serialize;
use tracing::debug;

/// One generated source file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CodeFile {
    /// The file name, e.g. `fc1.vhd`.
    pub name: String,
    /// The file contents, one entry per line without terminators.
    pub lines: Vec<String>,
}

impl CodeFile {
    fn from_text(name: String, text: &str) -> Self {
        Self {
            name,
            lines: text.lines().map(str::to_string).collect(),
        }
    }

    /// The contents joined with `\n`.
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }
}

/// The files describing one translated layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Design {
    /// The design name, equal to the top-level entity name.
    pub name: String,
    /// The generated files, top-level entity first.
    pub files: Vec<CodeFile>,
}

impl Design {
    /// Looks up a file by name.
    pub fn file(&self, name: &str) -> Option<&CodeFile> {
        self.files.iter().find(|f| f.name == name)
    }
}

/// Rejects names that are not basic VHDL identifiers: a letter followed by
/// letters, digits and single underscores, not ending in an underscore.
pub fn check_identifier(name: &str) -> Result<(), TranslateError> {
    if is_basic_identifier(name) {
        Ok(())
    } else {
        Err(TranslateError::InvalidName(name.to_string()))
    }
}

/// Number of address bits needed for `count` words, at least one.
pub fn address_width(count: usize) -> u32 {
    (usize::BITS - count.saturating_sub(1).leading_zeros()).max(1)
}

fn count(n: usize) -> TemplateValue {
    TemplateValue::Text(n.to_string())
}

/// A ROM holding `values`, zero-padded to `2^address_width(values.len())`
/// words of `total_bits` bits each.
pub fn rom_file(
    name: &str,
    values: &[i64],
    total_bits: u32,
    resource_option: ResourceOption,
) -> Result<CodeFile, TranslateError> {
    check_identifier(name)?;
    let addr_width = address_width(values.len());
    let depth = 1usize << addr_width;
    let words = values
        .iter()
        .copied()
        .chain(std::iter::repeat(0))
        .take(depth)
        .map(|v| to_twos_complement(v, total_bits).map(|bits| format!("\"{bits}\"")))
        .collect::<Result<Vec<_>, _>>()?;

    let template = TemplateBuilder::new()
        .set_prototype(prototypes::ROM)
        .add_parameter("name", ParameterType::analysing(EntityName))
        .add_parameter("ADDR_WIDTH", ParameterType::plain(GenericDefault))
        .add_parameter("DATA_WIDTH", ParameterType::plain(GenericDefault))
        .add_parameter("rom_values", ParameterType::plain(ArrayLiteral::new("ROM")))
        .add_parameter("rom_style", ParameterType::plain(AttributeValue::new("rom_style")))
        .build()?;

    let mut mapping = TemplateParameters::new();
    mapping.insert("name".to_string(), name.into());
    mapping.insert("ADDR_WIDTH".to_string(), addr_width.into());
    mapping.insert("DATA_WIDTH".to_string(), total_bits.into());
    mapping.insert("rom_values".to_string(), words.join(", ").into());
    mapping.insert("rom_style".to_string(), resource_option.as_str().into());

    debug!(rom = name, depth, addr_width, "rendering rom");
    Ok(CodeFile::from_text(format!("{name}.vhd"), &template.render(&mapping)?))
}

/// A sequential fixed-point linear layer with its weight and bias ROMs.
#[derive(Debug, Clone, Copy)]
pub struct FpLinearDesign<'a> {
    bundle: &'a ParameterBundle,
    settings: &'a ResolvedLayer,
}

impl<'a> FpLinearDesign<'a> {
    /// Prepares the design for `bundle` using the library and ROM style of
    /// `settings`.
    pub fn from_bundle(bundle: &'a ParameterBundle, settings: &'a ResolvedLayer) -> Self {
        Self { bundle, settings }
    }

    /// Renders `<name>.vhd`, `<name>_w_rom.vhd` and `<name>_b_rom.vhd`.
    ///
    /// Weights are stored row-major: the weight of input `i` for output `o`
    /// is at address `o * in_features + i`.
    pub fn build(&self) -> Result<Design, TranslateError> {
        let bundle = self.bundle;
        let name = bundle.name.as_str();
        check_identifier(name)?;
        check_identifier(&self.settings.work_library)?;
        let total_bits = bundle.config.total_bits();

        let template = TemplateBuilder::new()
            .set_prototype(prototypes::FP_LINEAR)
            .add_parameter("name", ParameterType::analysing(EntityName))
            .add_parameter("work_library", ParameterType::plain(Literal::new(r"\bwork\b")))
            .add_parameter("DATA_WIDTH", ParameterType::plain(GenericDefault))
            .add_parameter("FRAC_WIDTH", ParameterType::plain(GenericDefault))
            .add_parameter("X_ADDR_WIDTH", ParameterType::plain(GenericDefault))
            .add_parameter("Y_ADDR_WIDTH", ParameterType::plain(GenericDefault))
            .add_parameter("W_ADDR_WIDTH", ParameterType::plain(GenericDefault))
            .add_parameter("IN_FEATURE_NUM", ParameterType::plain(GenericDefault))
            .add_parameter("OUT_FEATURE_NUM", ParameterType::plain(GenericDefault))
            .build()?;

        let weight_count = bundle.in_features * bundle.out_features;
        let mut mapping = TemplateParameters::new();
        mapping.insert("name".to_string(), name.into());
        mapping.insert(
            "work_library".to_string(),
            self.settings.work_library.as_str().into(),
        );
        mapping.insert("DATA_WIDTH".to_string(), total_bits.into());
        mapping.insert("FRAC_WIDTH".to_string(), bundle.config.frac_bits().into());
        mapping.insert("X_ADDR_WIDTH".to_string(), address_width(bundle.in_features).into());
        mapping.insert("Y_ADDR_WIDTH".to_string(), address_width(bundle.out_features).into());
        mapping.insert("W_ADDR_WIDTH".to_string(), address_width(weight_count).into());
        mapping.insert("IN_FEATURE_NUM".to_string(), count(bundle.in_features));
        mapping.insert("OUT_FEATURE_NUM".to_string(), count(bundle.out_features));

        let flat_weights: Vec<i64> = bundle.weights.iter().flatten().copied().collect();
        let resource_option = self.settings.resource_option;
        let files = vec![
            CodeFile::from_text(format!("{name}.vhd"), &template.render(&mapping)?),
            rom_file(&format!("{name}_w_rom"), &flat_weights, total_bits, resource_option)?,
            rom_file(&format!("{name}_b_rom"), &bundle.bias, total_bits, resource_option)?,
        ];

        debug!(
            design = name,
            in_features = bundle.in_features,
            out_features = bundle.out_features,
            "assembled linear design"
        );
        Ok(Design {
            name: name.to_string(),
            files,
        })
    }
}

/// A combinational step function approximating a scalar activation.
#[derive(Debug, Clone)]
pub struct LookupTableDesign {
    name: String,
    config: FixedPointConfig,
    breakpoints: Vec<i64>,
    outputs: Vec<i64>,
}

impl LookupTableDesign {
    /// Prepares a table mapping the intervals between encoded `breakpoints`
    /// to encoded `outputs`, one more output than breakpoints.
    pub fn new(
        name: impl Into<String>,
        config: FixedPointConfig,
        breakpoints: Vec<i64>,
        outputs: Vec<i64>,
    ) -> Self {
        Self {
            name: name.into(),
            config,
            breakpoints,
            outputs,
        }
    }

    fn entity(&self) -> Entity {
        let data_range = "DATA_WIDTH-1 downto 0";
        Entity::new(self.name.as_str())
            .with_generic(
                InterfaceVariable::new("DATA_WIDTH", DataType::Integer)
                    .with_value(self.config.total_bits().to_string()),
            )
            .with_generic(
                InterfaceVariable::new("FRAC_WIDTH", DataType::Integer)
                    .with_value(self.config.frac_bits().to_string()),
            )
            .with_port(
                InterfaceVariable::new("x", DataType::Signed)
                    .with_mode(Mode::In)
                    .with_range(data_range),
            )
            .with_port(
                InterfaceVariable::new("y", DataType::Signed)
                    .with_mode(Mode::Out)
                    .with_range(data_range),
            )
    }

    /// Renders `<name>.vhd` from the structural IR.
    pub fn build(&self) -> Result<Design, TranslateError> {
        check_identifier(&self.name)?;
        let body = precomputed_scalar_function_process(
            &self.breakpoints,
            &self.outputs,
            self.config.total_bits(),
        )?;
        let process = Process::new(self.name.as_str(), "x")
            .with_declaration("variable int_x : integer := 0")
            .with_statement("int_x := to_integer(x)")
            .with_lookup_table(body);
        let architecture = Architecture::new("rtl", self.name.as_str()).with_process(process);

        let lines = Library::new()
            .lines()
            .chain(std::iter::once(String::new()))
            .chain(self.entity().lines())
            .chain(std::iter::once(String::new()))
            .chain(architecture.lines())
            .collect();

        debug!(
            design = %self.name,
            breakpoints = self.breakpoints.len(),
            "assembled lookup-table design"
        );
        Ok(Design {
            name: self.name.clone(),
            files: vec![CodeFile {
                name: format!("{}.vhd", self.name),
                lines,
            }],
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nnhdl_common::from_twos_complement;
    use nnhdl_config::{resolve_layer, TranslationConfig};

    fn settings(name: &str) -> ResolvedLayer {
        resolve_layer(&TranslationConfig::default(), name).unwrap()
    }

    fn bundle() -> ParameterBundle {
        ParameterBundle {
            name: "fc1".to_string(),
            in_features: 3,
            out_features: 2,
            config: FixedPointConfig::new(8, 4).unwrap(),
            weights: vec![vec![1, 2, 3], vec![-1, -2, -3]],
            bias: vec![16, -16],
        }
    }

    fn rom_words(file: &CodeFile) -> Vec<String> {
        let line = file
            .lines
            .iter()
            .find(|l| l.trim_start().starts_with("signal ROM"))
            .unwrap();
        let start = line.find('(').unwrap() + 1;
        let end = line.rfind(')').unwrap();
        line[start..end]
            .split(", ")
            .map(|w| w.trim_matches('"').to_string())
            .collect()
    }

    #[test]
    fn address_widths() {
        assert_eq!(address_width(0), 1);
        assert_eq!(address_width(1), 1);
        assert_eq!(address_width(2), 1);
        assert_eq!(address_width(3), 2);
        assert_eq!(address_width(4), 2);
        assert_eq!(address_width(5), 3);
        assert_eq!(address_width(6), 3);
        assert_eq!(address_width(1024), 10);
        assert_eq!(address_width(1025), 11);
    }

    #[test]
    fn identifiers() {
        assert!(check_identifier("fc1").is_ok());
        assert!(check_identifier("layer_2_out").is_ok());
        assert!(check_identifier("").is_err());
        assert!(check_identifier("1fc").is_err());
        assert!(check_identifier("_fc").is_err());
        assert!(check_identifier("fc_").is_err());
        assert!(check_identifier("fc__1").is_err());
        assert!(check_identifier("fc.1").is_err());
    }

    #[test]
    fn rom_is_padded_to_full_depth() {
        let file = rom_file("r", &[1, -1, 5], 8, ResourceOption::Auto).unwrap();
        assert_eq!(file.name, "r.vhd");
        let words = rom_words(&file);
        assert_eq!(words, vec!["00000001", "11111111", "00000101", "00000000"]);
    }

    #[test]
    fn rom_words_decode_to_values() {
        let values = [3, -7, 0, 100, -128];
        let file = rom_file("r", &values, 8, ResourceOption::Block).unwrap();
        let words = rom_words(&file);
        assert_eq!(words.len(), 8);
        assert!(words.iter().all(|w| w.len() == 8));
        let decoded: Vec<i64> = words
            .iter()
            .map(|w| from_twos_complement(w).unwrap())
            .collect();
        assert_eq!(decoded, vec![3, -7, 0, 100, -128, 0, 0, 0]);
    }

    #[test]
    fn rom_generics_and_style() {
        let file = rom_file("weights", &[0; 5], 12, ResourceOption::Distributed).unwrap();
        let text = file.text();
        assert!(text.contains("entity weights is"));
        assert!(text.contains("end architecture rtl;"));
        assert!(text.contains("ADDR_WIDTH : integer := 3;"));
        assert!(text.contains("DATA_WIDTH : integer := 12"));
        assert!(text.contains("attribute rom_style of ROM : signal is \"distributed\";"));
        assert!(!text.contains("rom_prototype"));
    }

    #[test]
    fn rom_rejects_out_of_range_values() {
        assert!(rom_file("r", &[200], 8, ResourceOption::Auto).is_err());
    }

    #[test]
    fn linear_design_files() {
        let bundle = bundle();
        let design = FpLinearDesign::from_bundle(&bundle, &settings("fc1"))
            .build()
            .unwrap();
        assert_eq!(design.name, "fc1");
        let names: Vec<&str> = design.files.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["fc1.vhd", "fc1_w_rom.vhd", "fc1_b_rom.vhd"]);
    }

    #[test]
    fn linear_design_generics() {
        let bundle = bundle();
        let design = FpLinearDesign::from_bundle(&bundle, &settings("fc1"))
            .build()
            .unwrap();
        let text = design.file("fc1.vhd").unwrap().text();
        assert!(text.contains("entity fc1 is"));
        assert!(text.contains("DATA_WIDTH : integer := 8;"));
        assert!(text.contains("FRAC_WIDTH : integer := 4;"));
        assert!(text.contains("X_ADDR_WIDTH : integer := 2;"));
        assert!(text.contains("Y_ADDR_WIDTH : integer := 1;"));
        assert!(text.contains("W_ADDR_WIDTH : integer := 3;"));
        assert!(text.contains("IN_FEATURE_NUM : integer := 3;"));
        assert!(text.contains("OUT_FEATURE_NUM : integer := 2"));
        assert!(text.contains("entity work.fc1_w_rom(rtl)"));
        assert!(text.contains("entity work.fc1_b_rom(rtl)"));
        assert!(!text.contains("fp_linear_1d"));
        assert!(!text.contains('$'));
    }

    #[test]
    fn linear_design_uses_configured_library() {
        let bundle = bundle();
        let mut settings = settings("fc1");
        settings.work_library = "nn".to_string();
        let design = FpLinearDesign::from_bundle(&bundle, &settings)
            .build()
            .unwrap();
        let text = design.file("fc1.vhd").unwrap().text();
        assert!(text.contains("library nn;"));
        assert!(text.contains("use nn.all;"));
        assert!(text.contains("entity nn.fc1_w_rom(rtl)"));
        assert!(!text.contains("work"));
    }

    #[test]
    fn linear_design_rejects_invalid_library() {
        let bundle = bundle();
        let mut settings = settings("fc1");
        settings.work_library = "my lib".to_string();
        let err = FpLinearDesign::from_bundle(&bundle, &settings)
            .build()
            .unwrap_err();
        assert!(matches!(err, TranslateError::InvalidName(name) if name == "my lib"));
    }

    #[test]
    fn weights_are_row_major() {
        let bundle = bundle();
        let design = FpLinearDesign::from_bundle(&bundle, &settings("fc1"))
            .build()
            .unwrap();
        let weights: Vec<i64> = rom_words(design.file("fc1_w_rom.vhd").unwrap())
            .iter()
            .map(|w| from_twos_complement(w).unwrap())
            .collect();
        assert_eq!(weights, vec![1, 2, 3, -1, -2, -3, 0, 0]);
        let bias: Vec<i64> = rom_words(design.file("fc1_b_rom.vhd").unwrap())
            .iter()
            .map(|w| from_twos_complement(w).unwrap())
            .collect();
        assert_eq!(bias, vec![16, -16]);
    }

    #[test]
    fn invalid_design_name() {
        let mut bundle = bundle();
        bundle.name = "fc-1".to_string();
        let err = FpLinearDesign::from_bundle(&bundle, &settings("fc-1"))
            .build()
            .unwrap_err();
        assert!(matches!(err, TranslateError::InvalidName(name) if name == "fc-1"));
    }

    #[test]
    fn lookup_table_design() {
        let config = FixedPointConfig::new(8, 4).unwrap();
        let design = LookupTableDesign::new("relu", config, vec![0], vec![0, 16])
            .build()
            .unwrap();
        assert_eq!(design.files.len(), 1);
        assert_eq!(
            design.files[0].lines,
            vec![
                "library ieee;",
                "use ieee.std_logic_1164.all;",
                "use ieee.numeric_std.all;",
                "",
                "entity relu is",
                "\tgeneric (",
                "\t\tDATA_WIDTH : integer := 8;",
                "\t\tFRAC_WIDTH : integer := 4",
                "\t);",
                "\tport (",
                "\t\tx : in signed(DATA_WIDTH-1 downto 0);",
                "\t\ty : out signed(DATA_WIDTH-1 downto 0)",
                "\t);",
                "end entity relu;",
                "",
                "architecture rtl of relu is",
                "begin",
                "\trelu_process: process(x)",
                "\t\tvariable int_x : integer := 0;",
                "\tbegin",
                "\t\tint_x := to_integer(x);",
                "\t\tif int_x<0 then",
                "\t\t\ty <= \"00000000\"; -- 0",
                "\t\telse",
                "\t\t\ty <= \"00010000\"; -- 16",
                "\t\tend if;",
                "\tend process relu_process;",
                "end architecture rtl;",
            ]
        );
    }

    #[test]
    fn lookup_table_length_mismatch() {
        let config = FixedPointConfig::new(8, 4).unwrap();
        let err = LookupTableDesign::new("t", config, vec![0, 1], vec![0])
            .build()
            .unwrap_err();
        assert!(matches!(err, TranslateError::LookupTable(_)));
    }

    #[test]
    fn design_serializes() {
        let config = FixedPointConfig::new(8, 4).unwrap();
        let design = LookupTableDesign::new("c", config, vec![], vec![1])
            .build()
            .unwrap();
        let json = serde_json::to_value(&design).unwrap();
        assert_eq!(json["name"], "c");
        assert_eq!(json["files"][0]["name"], "c.vhd");
    }
}
