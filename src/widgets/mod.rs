mod range_setting;

pub use range_setting::RangeSettingWidget;
