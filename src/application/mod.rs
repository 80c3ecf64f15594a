pub mod use_cases;

pub use use_cases::caption::CaptionUseCase;
pub use use_cases::place_info::PlaceInfoUseCase;
