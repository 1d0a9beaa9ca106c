pub mod notice_job;
