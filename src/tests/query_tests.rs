#[cfg(test)]
mod tests {
    use crate::query::{compose, BindValue, Fragment, Relation};
    use crate::repo::{
        AuthRepository, BansRepository, CommentsRepository, FollowsRepository, LikesRepository,
        PhotosRepository, UsersRepository,
    };

    fn filter(predicate: &str) -> Relation {
        let predicate = predicate.to_string();
        Relation::new(move |_| Fragment::filter(predicate.clone()))
    }

    fn join(sql: &str) -> Relation {
        let sql = sql.to_string();
        Relation::new(move |_| Fragment::join(sql.clone()))
    }

    #[test]
    fn test_zero_fragments_yield_empty_body() {
        let q = compose("photo", &[]);
        assert!(q.is_empty());
        assert!(q.binds.is_empty());
    }

    #[test]
    fn test_single_filter_introduced_with_where() {
        let q = compose("photo", &[filter("a = 1")]);
        assert_eq!(q.sql, "WHERE a = 1");
        assert!(Fragment::filter("a = 1").is_filter());
        assert!(!Fragment::join("INNER JOIN x ON y").is_filter());
    }

    #[test]
    fn test_filter_chain_has_one_where_and_conjunctive_continuations() {
        let q = compose("photo", &[filter("a = 1"), filter("b = 2"), filter("c = 3")]);
        assert_eq!(q.sql, "WHERE a = 1 AND b = 2 AND c = 3");
        assert_eq!(q.sql.matches("WHERE").count(), 1);
        assert_eq!(q.sql.matches("AND").count(), 2);
    }

    #[test]
    fn test_join_fragments_emitted_verbatim_regardless_of_position() {
        // A join between two filters must not be rewritten or reordered
        let q = compose(
            "photo",
            &[filter("a = 1"), join("INNER JOIN users ON users.id = photos.user_id"), filter("b = 2")],
        );
        assert_eq!(
            q.sql,
            "WHERE a = 1 INNER JOIN users ON users.id = photos.user_id AND b = 2"
        );
    }

    #[test]
    fn test_output_ordering_is_call_order_without_dedup() {
        let q = compose("photo", &[filter("a = 1"), filter("a = 1")]);
        assert_eq!(q.sql, "WHERE a = 1 AND a = 1");
    }

    #[test]
    fn test_binds_accumulate_in_emission_order() {
        let first = Relation::new(|_| {
            Fragment::join_with("J1", vec![BindValue::Int(1), BindValue::Int(2)])
        });
        let second =
            Relation::new(|_| Fragment::filter_with("x = ?", vec![BindValue::Text("a".into())]));
        let third = Relation::new(|_| Fragment::filter_with("y = ?", vec![BindValue::Int(3)]));

        let q = compose("photo", &[first, second, third]);
        assert_eq!(q.sql, "J1 WHERE x = ? AND y = ?");
        assert_eq!(
            q.binds,
            vec![
                BindValue::Int(1),
                BindValue::Int(2),
                BindValue::Text("a".into()),
                BindValue::Int(3),
            ]
        );
    }

    #[test]
    fn test_relations_are_pure_and_reusable_across_entities() {
        let relation = UsersRepository::filter_by_user_id(7);

        match relation.apply("user") {
            Fragment::Filter { predicate, binds } => {
                assert_eq!(predicate, "users.id = ?");
                assert_eq!(binds, vec![BindValue::Int(7)]);
            }
            other => panic!("expected filter, got {:?}", other),
        }
        match relation.apply("photo") {
            Fragment::Filter { predicate, .. } => assert_eq!(predicate, "photos.user_id = ?"),
            other => panic!("expected filter, got {:?}", other),
        }
    }

    #[test]
    fn test_ban_fragments_resolve_user_column_per_entity() {
        match BansRepository::without_banners(3).apply("user") {
            Fragment::Filter { predicate, binds } => {
                assert_eq!(
                    predicate,
                    "users.id NOT IN (SELECT user_id FROM user_bans WHERE banned_id = ?)"
                );
                assert_eq!(binds, vec![BindValue::Int(3)]);
            }
            other => panic!("expected filter, got {:?}", other),
        }
        match BansRepository::without_banned(3).apply("photo") {
            Fragment::Filter { predicate, .. } => {
                assert_eq!(
                    predicate,
                    "photos.user_id NOT IN (SELECT banned_id FROM user_bans WHERE user_id = ?)"
                );
            }
            other => panic!("expected filter, got {:?}", other),
        }
    }

    #[test]
    fn test_both_ban_directions_compose_into_one_predicate_chain() {
        let q = compose(
            "photo",
            &[BansRepository::without_banned(1), BansRepository::without_banners(1)],
        );
        assert!(q.sql.contains("NOT IN (SELECT banned_id FROM user_bans WHERE user_id = ?)"));
        assert!(q.sql.contains("NOT IN (SELECT user_id FROM user_bans WHERE banned_id = ?)"));
        assert_eq!(q.sql.matches("WHERE photos.user_id").count(), 1);
        assert!(q.sql.contains("AND photos.user_id"));
        assert_eq!(q.binds, vec![BindValue::Int(1), BindValue::Int(1)]);
    }

    #[test]
    fn test_follow_fragments_are_direction_parameterized_joins() {
        match FollowsRepository::filter_by_follower_id(5).apply("photo") {
            Fragment::Join { sql, binds } => {
                assert!(sql.contains("WHERE follower_id = ?"));
                assert!(sql.ends_with("ON following_id = photos.user_id"));
                assert_eq!(binds, vec![BindValue::Int(5)]);
            }
            other => panic!("expected join, got {:?}", other),
        }
        match FollowsRepository::filter_by_following_id(5).apply("user") {
            Fragment::Join { sql, .. } => {
                assert!(sql.contains("WHERE following_id = ?"));
                assert!(sql.ends_with("ON follower_id = users.id"));
            }
            other => panic!("expected join, got {:?}", other),
        }
    }

    #[test]
    fn test_count_joins_expand_entity_tables() {
        match LikesRepository::with_total_likes().apply("photo") {
            Fragment::Join { sql, binds } => {
                assert_eq!(
                    sql,
                    "LEFT JOIN (SELECT photo_id AS likes_photos_id, COUNT(*) AS total_likes FROM likes GROUP BY photo_id) ON photos.id = likes_photos_id"
                );
                assert!(binds.is_empty());
            }
            other => panic!("expected join, got {:?}", other),
        }
        match CommentsRepository::with_total_comments().apply("photo") {
            Fragment::Join { sql, .. } => {
                assert!(sql.contains("COUNT(*) AS total_comments"));
                assert!(sql.ends_with("ON photos.id = comments_photos_id"));
            }
            other => panic!("expected join, got {:?}", other),
        }
        match PhotosRepository::with_total_photos().apply("user") {
            Fragment::Join { sql, .. } => {
                assert!(sql.contains("COUNT(*) AS total_photos"));
                assert!(sql.ends_with("ON users.id = user_id"));
            }
            other => panic!("expected join, got {:?}", other),
        }
    }

    #[test]
    fn test_username_filter_strict_and_fuzzy() {
        match UsersRepository::filter_by_username("alice", true).apply("user") {
            Fragment::Filter { predicate, binds } => {
                assert_eq!(predicate, "username = ?");
                assert_eq!(binds, vec![BindValue::Text("alice".into())]);
            }
            other => panic!("expected filter, got {:?}", other),
        }
        // Fuzzy matching escapes LIKE wildcards in the needle
        match UsersRepository::filter_by_username("al_ce%", false).apply("user") {
            Fragment::Filter { predicate, binds } => {
                assert_eq!(predicate, "username LIKE ? ESCAPE '!'");
                assert_eq!(binds, vec![BindValue::Text("%al!_ce!%%".into())]);
            }
            other => panic!("expected filter, got {:?}", other),
        }
    }

    #[test]
    fn test_token_fragments() {
        match AuthRepository::with_tokens().apply("user") {
            Fragment::Join { sql, .. } => {
                assert_eq!(sql, "INNER JOIN user_tokens ON users.id = user_id");
            }
            other => panic!("expected join, got {:?}", other),
        }
        match AuthRepository::filter_by_token("secret").apply("user_token") {
            Fragment::Filter { predicate, binds } => {
                assert_eq!(predicate, "token = ?");
                assert_eq!(binds, vec![BindValue::Text("secret".into())]);
            }
            other => panic!("expected filter, got {:?}", other),
        }
    }

    #[test]
    fn test_gallery_relation_set_composes_into_valid_shape() {
        // The gallery listing: joins first, then the filter chain
        let relations = vec![
            UsersRepository::with_users(),
            LikesRepository::with_total_likes(),
            CommentsRepository::with_total_comments(),
            LikesRepository::with_liked_by(1),
            UsersRepository::filter_by_user_id(2),
            BansRepository::without_banned(1),
            BansRepository::without_banners(1),
        ];
        let q = compose("photo", &relations);

        // The outer predicate chain starts after every join (the liked-by
        // join carries its own WHERE inside its subselect)
        let where_pos = q.sql.find("WHERE photos.user_id = ?").unwrap();
        let last_join_pos = q.sql.rfind("LEFT JOIN").unwrap();
        assert!(last_join_pos < where_pos, "joins must precede the predicate chain");
        assert!(q.sql.contains("AND photos.user_id NOT IN"));
        // liked-by bind comes before the filter binds, in call order
        assert_eq!(
            q.binds,
            vec![BindValue::Int(1), BindValue::Int(2), BindValue::Int(1), BindValue::Int(1)]
        );
    }
}
