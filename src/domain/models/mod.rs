// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域模型模块
///
/// 该模块定义了系统的核心业务实体，包括：
/// - 爬取状态（crawl）：单个类目任务的状态机与终止报告
/// - 客户端身份（identity）：User-Agent 与代理组合
/// - 页面（page）：抓取结果与页面分类
/// - 商品（product）：商品引用与商品详情记录
pub mod crawl;
pub mod identity;
pub mod page;
pub mod product;
