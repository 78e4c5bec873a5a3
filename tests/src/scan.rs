mod integration;
mod report;
