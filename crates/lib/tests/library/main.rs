mod assembly_tests;
mod common;
mod construct_tests;
