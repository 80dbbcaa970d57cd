pub mod check;
pub mod dispatch;
pub mod fields;
pub mod form;
pub mod groups;
pub mod legacy;
pub mod roles;
pub mod schema;
pub mod sections;
pub mod shared;
