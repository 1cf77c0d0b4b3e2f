//! AWS region to Fly.io region mapping
//!
//! Keeps a DynamoDB table and the Fly.io machines running against it in
//! the same geography.

/// Fly.io region used when the AWS region is unknown or unset
pub const DEFAULT_FLY_REGION: &str = "iad";

const REGION_TABLE: &[(&str, &str)] = &[
    // US East
    ("us-east-1", "iad"), // Washington, DC
    ("us-east-2", "ord"), // Chicago
    // US West
    ("us-west-1", "sea"), // Seattle
    ("us-west-2", "dfw"), // Dallas
    // Europe
    ("eu-west-1", "ams"),    // Amsterdam
    ("eu-west-2", "lhr"),    // London
    ("eu-west-3", "cdg"),    // Paris
    ("eu-central-1", "fra"), // Frankfurt
    ("eu-north-1", "arn"),   // Stockholm
    // Asia Pacific
    ("ap-southeast-1", "sin"), // Singapore
    ("ap-southeast-2", "syd"), // Sydney
    ("ap-northeast-1", "nrt"), // Tokyo
    ("ap-south-1", "bom"),     // Mumbai
    // South America
    ("sa-east-1", "gru"), // São Paulo
];

/// Map an AWS region code to a Fly.io region code
pub fn fly_region(aws_region: &str) -> &'static str {
    REGION_TABLE
        .iter()
        .find(|(aws, _)| *aws == aws_region)
        .map(|(_, fly)| *fly)
        .unwrap_or(DEFAULT_FLY_REGION)
}
