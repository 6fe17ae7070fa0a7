// Symbol table and function signature table for the Cinder checker.

pub mod env;
