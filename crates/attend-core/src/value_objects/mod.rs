//! Value objects - immutable types that represent domain concepts

mod attribute;
mod check_in_method;
mod civil_date;
mod role_ids;

pub use attribute::{Attribute, AttributeParseError};
pub use check_in_method::CheckInMethod;
pub use civil_date::{CivilCalendar, CivilDate, CivilDateParseError, Clock, ManualClock, SystemClock};
pub use role_ids::{encode_role_ids, parse_id_list, parse_role_ids};
