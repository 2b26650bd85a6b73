pub mod instruction_reader;
pub mod report_writer;
