mod result_vm;
mod test_vm;
mod time_fmt;

pub use result_vm::ResultVm;
pub use test_vm::{
    NavDotState, NavDotVm, OptionVm, TestIntent, TestScreenVm, TestVm, option_for_key,
};
pub use time_fmt::{format_datetime, format_elapsed};
