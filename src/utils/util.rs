use crate::error::SvConvertResult;
use log;
use std::{
    fmt::{Binary, Display},
    sync::Once,
};

pub type Result<T> = SvConvertResult<T>;

#[allow(unused)]
static INIT_LOG: Once = Once::new();

#[allow(unused)]
pub fn init_logger() {
    INIT_LOG.call_once(|| {
        env_logger::builder()
            .filter_level(log::LevelFilter::Trace)
            .is_test(true)
            .init();
    });
}

pub fn handle_error_and_exit(err: impl Display) -> ! {
    log::error!("{err}");
    std::process::exit(1);
}

pub fn format_number_with_commas<T>(n: T) -> String
where
    T: Display + Binary,
{
    let s = n.to_string();
    let (sign, digits) = s.strip_prefix('-').map_or(("", s.as_str()), |d| ("-", d));
    if digits.len() <= 3 {
        return s;
    }

    let mut grouped: Vec<char> = Vec::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    let body: String = grouped.into_iter().rev().collect();
    format!("{sign}{body}")
}
