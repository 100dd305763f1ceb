// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

pub mod api_tests;
pub mod category_crawl_test;
pub mod helpers;
pub mod product_details_test;
