use clap::Parser;
use dt_wsdl_generator::{naming::DEFAULT_MAX_NAME_SUFFIX, Options, TargetLanguage};

#[derive(Parser)]
#[clap(version, about)]
pub struct Cli {
    #[clap(value_parser, help = "The source file or URL")]
    pub input: String,

    #[clap(long, help = "Allow a XML Document Type Definition (DTD) to occur")]
    pub allow_dtd: bool,

    #[clap(long, default_value = "", help = "Prefix for every model name")]
    pub model_name_prefix: String,

    #[clap(long, default_value = "", help = "Suffix for every model name")]
    pub model_name_suffix: String,

    #[clap(
        long,
        default_value_t = DEFAULT_MAX_NAME_SUFFIX,
        help = "Numeric suffixes tried when model names collide"
    )]
    pub max_name_suffix: u32,

    #[clap(long, value_enum, default_value = "rust")]
    pub target: TargetLanguage,
}

impl Cli {
    pub fn options(&self) -> Options {
        Options {
            model_name_prefix: self.model_name_prefix.clone(),
            model_name_suffix: self.model_name_suffix.clone(),
            max_name_suffix: self.max_name_suffix,
            target: self.target,
            ..Options::default()
        }
    }
}
