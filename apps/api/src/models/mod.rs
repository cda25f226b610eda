pub mod backlink;
pub mod content;
pub mod credit;
pub mod keyword;
pub mod notification;
pub mod outreach;
pub mod project;
pub mod report;
pub mod user;
