pub mod a001_lead;
