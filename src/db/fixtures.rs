// src/db/fixtures.rs
// DOCUMENTATION: Built-in demo tables
// PURPOSE: Seed data for the in-memory repositories

use crate::models::{Photo, Post, Product};
use chrono::NaiveDate;

const UNSPLASH: &str = "https://images.unsplash.com";

pub fn photos() -> Vec<Photo> {
    vec![
        Photo::new(
            "1",
            "Mountains",
            &format!("{}/photo-1506905925346-21bda4d32df4", UNSPLASH),
            "A sweeping mountain range showing the power and beauty of nature.",
        ),
        Photo::new(
            "2",
            "Beach",
            &format!("{}/photo-1507525428034-b723cf961d3e", UNSPLASH),
            "Waves brushing a golden beach.",
        ),
        Photo::new(
            "3",
            "Forest",
            &format!("{}/photo-1441974231531-c6227db76b6e", UNSPLASH),
            "A quiet forest path with sunlight through the leaves.",
        ),
        Photo::new(
            "4",
            "City",
            &format!("{}/photo-1477959858617-67f85cf4f1df", UNSPLASH),
            "A modern skyline lit up at night.",
        ),
        Photo::new(
            "5",
            "Desert",
            &format!("{}/photo-1509316785289-025f5b846b35", UNSPLASH),
            "Endless dunes reshaped by the wind.",
        ),
        Photo::new(
            "6",
            "Lake",
            &format!("{}/photo-1472214103451-9374bd1c798e", UNSPLASH),
            "A clear lake, still as a mirror.",
        ),
    ]
}

pub fn products() -> Vec<Product> {
    vec![
        Product::new("1", "Product A", "Detailed description of product A", 99),
        Product::new("2", "Product B", "Detailed description of product B", 199),
        Product::new("3", "Product C", "Detailed description of product C", 299),
    ]
}

pub fn posts() -> Vec<Post> {
    vec![
        post(
            "getting-started-with-nextjs",
            "Getting started with segment routing",
            "Directory-style routing gives every page a place in the tree.\n\n\
             Layouts are shared, pages are leaves, and dynamic segments capture one path component each.\n\n\
             Start by registering a root layout and a home page.",
            "Zhang San",
            (2024, 1, 15),
        ),
        post(
            "app-router-deep-dive",
            "Router deep dive",
            "The router resolves a path into a chain of segments.\n\n\
             Layouts share UI, loading fallbacks stream while data arrives, and error boundaries isolate failures.\n\n\
             Literal segments always win over dynamic ones at the same depth.",
            "Li Si",
            (2024, 1, 20),
        ),
        post(
            "server-components-vs-client-components",
            "Server rendering versus client rendering",
            "Server-rendered content can read data directly and adds nothing to the client bundle.\n\n\
             Client-side behaviour handles interaction and browser APIs.\n\n\
             Streaming lets the two meet: the shell arrives first and slower parts follow.",
            "Wang Wu",
            (2024, 1, 25),
        ),
    ]
}

fn post(slug: &str, title: &str, content: &str, author: &str, (y, m, d): (i32, u32, u32)) -> Post {
    Post {
        slug: slug.to_string(),
        title: title.to_string(),
        content: content.to_string(),
        author: author.to_string(),
        date: NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default(),
    }
}
